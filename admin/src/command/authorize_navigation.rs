//! [`Command`] for authorizing a navigation to a [`Route`].

use std::convert::Infallible;

use derive_more::From;
use tracing as log;

use crate::{domain::Route, infra::Transport, Console};

use super::Command;

/// [`Command`] for authorizing a navigation to a [`Route`].
///
/// Only checks that a [`Session`] token is present: its validity is
/// discovered by the first API call rejecting it.
///
/// [`Session`]: crate::domain::Session
#[derive(Clone, Copy, Debug, From)]
pub struct AuthorizeNavigation {
    /// [`Route`] being navigated to.
    pub route: Route,
}

/// Outcome of an [`AuthorizeNavigation`] [`Command`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Navigation {
    /// Requested [`Route`] may be rendered.
    Render(Route),

    /// Navigation is replaced with the provided [`Route`].
    ///
    /// The requested destination is not remembered.
    Redirect(Route),
}

impl<A: Transport> Command<AuthorizeNavigation> for Console<A> {
    type Ok = Navigation;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: AuthorizeNavigation,
    ) -> Result<Self::Ok, Self::Err> {
        let AuthorizeNavigation { route } = cmd;

        if !route.is_protected() || self.sessions().token().is_some() {
            return Ok(Navigation::Render(route));
        }
        log::debug!(%route, "no session, redirecting to login");
        Ok(Navigation::Redirect(Route::Login))
    }
}
