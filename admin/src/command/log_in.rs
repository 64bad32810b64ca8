//! [`Command`] for logging the operator in.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox};
use serde_json::json;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{session::Password, Session},
    infra::{
        api::{self, Path, Payload},
        storage, Transport,
    },
    Console,
};

use super::Command;

/// [`Command`] for logging the operator in.
///
/// Persists the obtained [`Session`], replacing the current one.
#[derive(Clone, Debug)]
pub struct LogIn {
    /// Email the operator is registered with.
    pub email: String,

    /// [`Password`] of the operator.
    pub password: SecretBox<Password>,
}

impl LogIn {
    /// API endpoint exchanging credentials for a [`Session`].
    pub const ENDPOINT: &'static str = "/auth/login";
}

impl<A: Transport> Command<LogIn> for Console<A> {
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: LogIn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let LogIn { email, password } = cmd;

        let body = json!({
            "email": email,
            "password": password.expose_secret().as_ref(),
        });
        let res = self
            .api()
            .execute(Insert(Payload::new(Path::new(LogIn::ENDPOINT), body)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let session = serde_json::from_value::<Session>(res)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.sessions()
            .set(&session)
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(%email, "logged in");
        Ok(session)
    }
}

/// Error of [`LogIn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// API request failed.
    #[display("Login request failed: {_0}")]
    Api(api::Error),

    /// Response is not a [`Session`].
    #[display("Login response is malformed: {_0}")]
    Decode(serde_json::Error),

    /// [`Session`] cannot be persisted.
    #[display("Failed to persist the session: {_0}")]
    Storage(storage::Error),
}

impl ExecutionError {
    /// Message shown when the server gave no better one.
    pub const FALLBACK_MESSAGE: &'static str =
        "Login failed. Check your credentials.";

    /// Returns the message to show on the login form.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Api(e) => e.message().unwrap_or(Self::FALLBACK_MESSAGE),
            Self::Decode(_) | Self::Storage(_) => Self::FALLBACK_MESSAGE,
        }
    }
}
