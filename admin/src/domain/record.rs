//! [`Record`] definitions.

use derive_more::{AsRef, Display, From};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Persisted content record of any [`Schema`].
///
/// [`Schema`]: super::Schema
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
    /// ID assigned to this [`Record`] by the server.
    #[serde(rename = "_id")]
    pub id: Id,

    /// Every other field of this [`Record`], as the server sent it.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Returns the value of the provided field, if this [`Record`] has one.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }
}

/// Opaque ID of a [`Record`], assigned by the server.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Id(String);
