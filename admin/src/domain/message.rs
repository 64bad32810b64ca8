//! Inbound contact [`Message`] definitions.

use common::DateTime;
use serde::{Deserialize, Serialize};

use super::record::Id;

/// Contact message left by a site visitor.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// ID of this [`Message`].
    #[serde(rename = "_id")]
    pub id: Id,

    /// Name the sender introduced themselves with.
    #[serde(default)]
    pub name: String,

    /// Email address to reply to.
    #[serde(default)]
    pub email: String,

    /// Subject line, if the sender provided one.
    #[serde(default)]
    pub subject: Option<String>,

    /// Body of this [`Message`].
    #[serde(default)]
    pub message: String,

    /// [`DateTime`] when this [`Message`] was received.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: DateTime,
}

impl Message {
    /// Placeholder shown instead of a missing subject.
    pub const NO_SUBJECT: &'static str = "(No subject)";

    /// Returns the subject of this [`Message`], or [`Message::NO_SUBJECT`] if
    /// it has none.
    #[must_use]
    pub fn subject_or_placeholder(&self) -> &str {
        self.subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(Self::NO_SUBJECT)
    }
}

/// Page of [`Message`]s served by the contact endpoint.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Inbox {
    /// [`Message`]s, newest first.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Total number of [`Message`]s on the server.
    #[serde(default)]
    pub total: u64,
}
