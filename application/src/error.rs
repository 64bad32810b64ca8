//! [`Error`]-related definitions.

use std::io;

use derive_more::{Display, Error as StdError, From};
use tracerr::{Trace, Traced};
use tracing as log;

/// Terminal outcome of a failed console command.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Command requires a session, but there is none.
    #[display("Not logged in, run `login` first")]
    #[from(ignore)]
    Unauthenticated,

    /// Command line input is invalid.
    #[display("{_0}")]
    #[from(ignore)]
    Input(#[error(not(source))] String),

    /// Operation failed with the provided message shown to the operator.
    #[display("{message}")]
    #[from(ignore)]
    Failed {
        /// Message shown to the operator.
        message: String,

        /// [`Trace`] of the underlying error.
        trace: Trace,
    },

    /// Terminal cannot be read or written.
    #[display("terminal I/O failed: {_0}")]
    Io(io::Error),
}

impl Error {
    /// Creates a new [`Error::Failed`] showing the provided `message`
    /// instead of the underlying error.
    ///
    /// The underlying error is logged for diagnostics.
    #[must_use]
    pub fn failed<E: Display>(
        message: impl Into<String>,
        err: Traced<E>,
    ) -> Self {
        let (err, trace) = err.split();
        log::debug!("{err}");
        Self::Failed {
            message: message.into(),
            trace,
        }
    }

    /// Returns the [`Trace`] of the underlying error, if any.
    #[must_use]
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Self::Failed { trace, .. } => Some(trace),
            Self::Unauthenticated | Self::Input(_) | Self::Io(_) => None,
        }
    }
}
