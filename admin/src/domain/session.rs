//! [`Session`] definitions.

use derive_more::{AsRef, Debug, Display, From};
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authenticated session of the console operator.
///
/// Has no local expiry: it's held until an explicit logout.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    /// [`Token`] attached to every protected request.
    pub token: Token,

    /// [`User`] profile this [`Session`] belongs to, if the server sent one.
    #[serde(default)]
    pub user: Option<User>,
}

/// Opaque bearer token of a [`Session`].
#[derive(AsRef, Clone, Debug, Deserialize, Eq, From, PartialEq, Serialize)]
#[as_ref(str)]
#[debug("Token(..)")]
#[from(&str, String)]
#[serde(transparent)]
pub struct Token(String);

/// Profile of the operator owning a [`Session`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Any other profile fields, kept as is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Password submitted when logging in.
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
