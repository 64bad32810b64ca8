//! [`Command`] definition.

pub mod authorize_navigation;
pub mod log_in;
pub mod log_out;

/// [`Command`] of the [`Console`].
///
/// [`Console`]: crate::Console
pub use common::Handler as Command;

pub use self::{
    authorize_navigation::{AuthorizeNavigation, Navigation},
    log_in::LogIn,
    log_out::LogOut,
};
