//! [`Confirm`]ation of destructive actions.

use std::future::IntoFuture;

use derive_more::Debug;
use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _,
};
use tokio::sync::oneshot;

/// Operator's answer to a confirmation prompt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Action is confirmed.
    Confirmed,

    /// Action is declined.
    Declined,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Asks the operator a yes/no question.
pub trait Confirm {
    /// Requests a [`Decision`] on the provided `prompt`.
    fn confirm(&self, prompt: String) -> Pending;
}

/// Fixed [`Decision`] answering every prompt.
impl Confirm for Decision {
    fn confirm(&self, _: String) -> Pending {
        Pending::new(future::ready(*self))
    }
}

/// [`Decision`] not made yet.
#[derive(Debug)]
#[debug("Pending")]
pub struct Pending(LocalBoxFuture<'static, Decision>);

impl Pending {
    /// Creates a new [`Pending`] [`Decision`] resolved by the provided
    /// future.
    pub fn new(decision: impl IntoFuture<Output = Decision> + 'static) -> Self {
        Self(decision.into_future().boxed_local())
    }
}

impl IntoFuture for Pending {
    type Output = Decision;
    type IntoFuture = LocalBoxFuture<'static, Decision>;

    fn into_future(self) -> Self::IntoFuture {
        self.0
    }
}

/// Prompt waiting for the UI layer to resolve it.
#[derive(Debug)]
pub struct Request {
    /// Question being asked.
    prompt: String,

    /// Channel the [`Decision`] is sent into.
    answer: oneshot::Sender<Decision>,
}

impl Request {
    /// Returns the question being asked.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Resolves this [`Request`] with the provided [`Decision`].
    pub fn resolve(self, decision: Decision) {
        // Receiver may be gone already, nobody waits for the answer then.
        _ = self.answer.send(decision);
    }
}

/// Creates a new confirmation [`Request`] along with its [`Pending`]
/// [`Decision`].
///
/// Dropping the [`Request`] unresolved resolves the [`Pending`] [`Decision`]
/// as [`Decision::Declined`].
#[must_use]
pub fn request(prompt: impl Into<String>) -> (Request, Pending) {
    let (tx, rx) = oneshot::channel();
    let pending = Pending::new(rx.map(|res| res.unwrap_or(Decision::Declined)));
    (
        Request {
            prompt: prompt.into(),
            answer: tx,
        },
        pending,
    )
}
