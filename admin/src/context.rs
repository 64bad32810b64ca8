//! [`Sessions`] context.

use std::rc::Rc;

use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{session::Token, Session, User},
    infra::{storage, Storage},
};

/// Explicit context owning the persisted [`Session`].
///
/// Created once at the root and cloned into everything needing the
/// [`Session`]: clones share the same [`Storage`].
#[derive(Clone, Debug)]
pub struct Sessions {
    /// [`Storage`] the [`Session`] is persisted into.
    storage: Rc<dyn Storage>,
}

impl Sessions {
    /// [`Storage`] key of the [`Session`] token.
    pub const TOKEN_KEY: &'static str = "token";

    /// [`Storage`] key of the [`Session`] user, stored as JSON.
    pub const USER_KEY: &'static str = "user";

    /// Creates a new [`Sessions`] context over the provided [`Storage`].
    #[must_use]
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Rc::new(storage),
        }
    }

    /// Returns the [`Token`] of the current [`Session`], if any.
    ///
    /// A [`Storage`] failure is logged and treated as an absent [`Session`].
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        match self.storage.get(Self::TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(Token::from),
            Err(e) => {
                log::warn!("cannot read session token: {e}");
                None
            }
        }
    }

    /// Returns the current [`Session`], if any.
    ///
    /// The stored [`User`] is best-effort: a malformed one is dropped rather
    /// than invalidating the whole [`Session`].
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        let token = self.token()?;
        let user = match self.storage.get(Self::USER_KEY) {
            Ok(user) => user.and_then(|raw| {
                serde_json::from_str::<User>(&raw)
                    .inspect_err(|e| {
                        log::warn!("stored session user is malformed: {e}");
                    })
                    .ok()
            }),
            Err(e) => {
                log::warn!("cannot read session user: {e}");
                None
            }
        };
        Some(Session { token, user })
    }

    /// Persists the provided [`Session`], replacing the current one.
    ///
    /// # Errors
    ///
    /// If the [`Storage`] cannot be written.
    pub fn set(&self, session: &Session) -> Result<(), Traced<storage::Error>> {
        self.storage
            .set(Self::TOKEN_KEY, session.token.as_ref().to_owned())
            .map_err(tracerr::wrap!())?;
        match &session.user {
            Some(user) => {
                let raw = serde_json::to_string(user)
                    .map_err(tracerr::from_and_wrap!(=> storage::Error))?;
                self.storage
                    .set(Self::USER_KEY, raw)
                    .map_err(tracerr::wrap!())
            }
            None => self
                .storage
                .remove(Self::USER_KEY)
                .map_err(tracerr::wrap!()),
        }
    }

    /// Removes the current [`Session`], if any.
    ///
    /// # Errors
    ///
    /// If the [`Storage`] cannot be written.
    pub fn clear(&self) -> Result<(), Traced<storage::Error>> {
        self.storage
            .remove(Self::TOKEN_KEY)
            .map_err(tracerr::wrap!())?;
        self.storage
            .remove(Self::USER_KEY)
            .map_err(tracerr::wrap!())
    }
}
