//! Infrastructure layer.

pub mod api;
pub mod storage;

pub use self::{
    api::{Api, Transport},
    storage::Storage,
};
#[cfg(feature = "http")]
pub use self::api::Http;
