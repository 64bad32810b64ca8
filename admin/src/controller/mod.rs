//! Page controllers driving the content lifecycle.
//!
//! Every controller owns the state of exactly one page instance. Operations
//! return `'static` futures holding only shared handles, so a page may be
//! torn down while its requests are still in flight: once the controller is
//! dropped, late responses are discarded instead of touching its state.

pub mod collection;
pub mod singleton;
pub mod viewer;

use std::cell::{Cell, Ref, RefCell, RefMut};

use derive_more::{AsRef, Display, Error, From};
use tracing as log;

use crate::infra::api;

pub use self::{
    collection::Collection,
    singleton::Singleton,
    viewer::{Feed, Viewer},
};

/// Page-level inline error message.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Banner(String);

impl Banner {
    /// Creates a new [`Banner`] with the provided text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

/// Blocking error message, kept until dismissed.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Alert(String);

impl Alert {
    /// Creates a new [`Alert`] with the provided text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

/// Error of a controller operation.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`api::Api`] request failed.
    #[display("API request failed: {_0}")]
    Api(api::Error),

    /// Response doesn't match the expected shape.
    #[display("unexpected API response: {_0}")]
    Decode(serde_json::Error),

    /// Same operation is already in flight.
    #[display("operation is already in progress")]
    #[from(ignore)]
    InProgress,
}

impl ExecutionError {
    /// Returns the human-readable message the server attached to this
    /// [`ExecutionError`], if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api(e) => e.message(),
            Self::Decode(_) | Self::InProgress => None,
        }
    }
}

/// State of a single page instance along with its liveness.
#[derive(Debug)]
struct Page<S> {
    /// State of this [`Page`].
    state: RefCell<S>,

    /// Indicates whether this [`Page`] is still displayed.
    mounted: Cell<bool>,
}

impl<S> Page<S> {
    /// Creates a new mounted [`Page`] with the provided state.
    fn new(state: S) -> Self {
        Self {
            state: RefCell::new(state),
            mounted: Cell::new(true),
        }
    }

    /// Borrows the state of this [`Page`].
    fn state(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    /// Mutably borrows the state of this [`Page`].
    fn state_mut(&self) -> RefMut<'_, S> {
        self.state.borrow_mut()
    }

    /// Applies the provided update to the state right away.
    ///
    /// Must only be used before the first suspension point of an operation,
    /// while the page is known to be displayed.
    fn now<R>(&self, update: impl FnOnce(&mut S) -> R) -> R {
        update(&mut self.state.borrow_mut())
    }

    /// Applies the provided update to the state if this [`Page`] is still
    /// mounted.
    fn settle<R>(&self, update: impl FnOnce(&mut S) -> R) -> Option<R> {
        if !self.mounted.get() {
            log::debug!("page is unmounted, discarding response");
            return None;
        }
        Some(self.now(update))
    }

    /// Marks this [`Page`] as no longer displayed.
    fn unmount(&self) {
        self.mounted.set(false);
    }
}
