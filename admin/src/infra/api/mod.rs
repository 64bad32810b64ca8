//! [`Api`] transport definitions.
//!
//! The admin console talks to the content API through a small set of verbs
//! exchanging raw JSON. Everything above this layer decides how that JSON is
//! interpreted.

#[cfg(feature = "http")]
pub mod http;
#[cfg(test)]
pub(crate) mod memory;

use std::fmt;

use common::operations::{Delete, Insert, Select, Update};
use derive_more::{AsRef, Display, Error as StdError, From};
use serde_json::Value;
use tracerr::Traced;

#[cfg(feature = "http")]
pub use self::http::Http;

/// API operation.
pub use common::Handler as Api;

/// Path of an [`Api`] resource, relative to the base URL.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Path(String);

impl Path {
    /// Creates a new [`Path`], making sure it starts with a `/`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.starts_with('/') {
            Self(path)
        } else {
            Self(format!("/{path}"))
        }
    }

    /// Returns the [`Path`] of a single member of this collection [`Path`].
    #[must_use]
    pub fn member(&self, id: impl fmt::Display) -> Self {
        Self(format!("{}/{id}", self.0.trim_end_matches('/')))
    }
}

/// Request body sent to a [`Path`].
#[derive(Clone, Debug)]
pub struct Payload {
    /// [`Path`] the body is sent to.
    pub path: Path,

    /// JSON body.
    pub body: Value,
}

impl Payload {
    /// Creates a new [`Payload`].
    #[must_use]
    pub fn new(path: Path, body: Value) -> Self {
        Self { path, body }
    }
}

/// Full set of [`Api`] verbs required by the admin console.
///
/// - [`Select`] issues a `GET`;
/// - [`Insert`] issues a `POST`;
/// - [`Update`] issues a `PUT`;
/// - [`Delete`] issues a `DELETE`.
pub trait Transport:
    Api<Select<Path>, Ok = Value, Err = Traced<Error>>
    + Api<Insert<Payload>, Ok = Value, Err = Traced<Error>>
    + Api<Update<Payload>, Ok = Value, Err = Traced<Error>>
    + Api<Delete<Path>, Ok = (), Err = Traced<Error>>
    + Clone
    + fmt::Debug
    + 'static
{
}

impl<T> Transport for T where
    T: Api<Select<Path>, Ok = Value, Err = Traced<Error>>
        + Api<Insert<Payload>, Ok = Value, Err = Traced<Error>>
        + Api<Update<Payload>, Ok = Value, Err = Traced<Error>>
        + Api<Delete<Path>, Ok = (), Err = Traced<Error>>
        + Clone
        + fmt::Debug
        + 'static
{
}

/// [`Api`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request could not be performed or its response could not be read.
    #[display("API request failed: {_0}")]
    #[from(ignore)]
    Transport(#[error(not(source))] String),

    /// Server responded with a non-successful status.
    #[display("API responded with `{status}`")]
    #[from(ignore)]
    Status {
        /// [`http::StatusCode`] of the response.
        status: ::http::StatusCode,

        /// JSON body of the response, if it had one.
        body: Option<Value>,
    },

    /// Response body is not valid JSON.
    #[display("API response is not valid JSON: {_0}")]
    Decode(serde_json::Error),
}

impl Error {
    /// Returns the human-readable message the server attached to this
    /// [`Error`], if any.
    ///
    /// The `message` field of the response body is preferred over the `error`
    /// one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let Self::Status {
            body: Some(body), ..
        } = self
        else {
            return None;
        };
        ["message", "error"]
            .into_iter()
            .filter_map(|key| body.get(key).and_then(Value::as_str))
            .find(|msg| !msg.trim().is_empty())
    }

    /// Indicates whether the server rejected the credentials of this request.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. }
                if *status == ::http::StatusCode::UNAUTHORIZED
                    || *status == ::http::StatusCode::FORBIDDEN,
        )
    }
}
