//! Key-value [`Storage`] persisting the admin session.

pub mod file;
pub mod memory;

use std::{fmt, io};

use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

pub use self::{file::File, memory::Memory};

/// Persistent key-value storage of string values.
///
/// Mirrors the browser local storage the admin session has always lived in:
/// values survive restarts and are addressed by a plain string key.
pub trait Storage: fmt::Debug {
    /// Returns the value stored under the provided `key`, if any.
    ///
    /// # Errors
    ///
    /// If the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Traced<Error>>;

    /// Stores the `value` under the provided `key`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// If the backing medium cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), Traced<Error>>;

    /// Removes the value stored under the provided `key`, if any.
    ///
    /// # Errors
    ///
    /// If the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), Traced<Error>>;
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Backing file cannot be accessed.
    #[display("storage I/O failed: {_0}")]
    Io(io::Error),

    /// Backing file contains malformed data.
    #[display("storage data is malformed: {_0}")]
    Json(serde_json::Error),
}
