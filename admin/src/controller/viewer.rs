//! [`Viewer`] controller of read-only feeds.

use std::{cell::Ref, future::Future, rc::Rc};

use common::operations::Select;
use serde_json::Value;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{record::Id, Inbox, Message},
    infra::{api::Path, Transport},
    state::{Identified, List, Selection},
};

use super::{Banner, ExecutionError, Page};

/// Read-only feed of items served at a single endpoint.
pub trait Feed {
    /// Type of the served items.
    type Item: Identified + Clone + 'static;

    /// API endpoint of this [`Feed`].
    const ENDPOINT: &'static str;

    /// Human name of several items.
    const PLURAL: &'static str;

    /// Decodes the response body of this [`Feed`] into its items.
    ///
    /// # Errors
    ///
    /// If the body doesn't match the expected shape.
    fn decode(body: Value) -> Result<Vec<Self::Item>, serde_json::Error>;
}

impl Feed for Inbox {
    type Item = Message;

    const ENDPOINT: &'static str = "/contact";
    const PLURAL: &'static str = "messages";

    fn decode(body: Value) -> Result<Vec<Message>, serde_json::Error> {
        if body.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value::<Self>(body).map(|inbox| inbox.messages)
    }
}

/// State of a [`Viewer`] page.
#[derive(Debug, SmartDefault)]
pub struct State<T> {
    /// Last successfully loaded items.
    pub items: List<T>,

    /// Item shown in the detail pane.
    pub selection: Selection,

    /// Indicates whether a load is in flight.
    #[default(true)]
    pub loading: bool,

    /// Inline error of the last failed load.
    pub banner: Option<Banner>,
}

impl<T: Identified> State<T> {
    /// Returns the item shown in the detail pane, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.selection.resolve(&self.items)
    }
}

/// Controller of a read-only page listing a [`Feed`] with a single selected
/// item.
#[derive(Debug)]
pub struct Viewer<F: Feed, A> {
    /// API the [`Feed`] is fetched from.
    api: A,

    /// State of this page.
    page: Rc<Page<State<F::Item>>>,
}

impl<F: Feed, A: Transport> Viewer<F, A> {
    /// Creates a new [`Viewer`] controller of the [`Feed`].
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            page: Rc::new(Page::new(State::default())),
        }
    }

    /// Borrows the current [`State`] of this page.
    #[must_use]
    pub fn state(&self) -> Ref<'_, State<F::Item>> {
        self.page.state()
    }

    /// Selects the item with the provided [`Id`] for the detail pane.
    ///
    /// Returns `false` and keeps the current selection if no such item is
    /// listed.
    pub fn select(&self, id: Id) -> bool {
        self.page.now(|s| {
            if !s.items.contains(&id) {
                return false;
            }
            s.selection.select(id);
            true
        })
    }

    /// Fetches the [`Feed`], replacing the listed items wholesale.
    ///
    /// The selection survives only if the selected item is still listed.
    pub fn load(
        &self,
    ) -> impl Future<Output = Result<(), Traced<ExecutionError>>> + 'static
    {
        let (api, page) = (self.api.clone(), Rc::clone(&self.page));
        page.now(|s| s.loading = true);

        async move {
            let res = fetch::<F, _>(&api).await;

            _ = page.settle(|s| {
                s.loading = false;
                match &res {
                    Ok(items) => {
                        s.items.replace(items.clone());
                        s.selection.retain(&s.items);
                    }
                    Err(e) => {
                        log::error!("failed to load `{}`: {e}", F::PLURAL);
                        s.banner =
                            Some(Banner::new(format!("Failed to load {}", F::PLURAL)));
                    }
                }
            });
            res.map(drop)
        }
    }
}

impl<F: Feed, A> Drop for Viewer<F, A> {
    fn drop(&mut self) {
        self.page.unmount();
    }
}

/// Fetches the items of the [`Feed`].
async fn fetch<F: Feed, A: Transport>(
    api: &A,
) -> Result<Vec<F::Item>, Traced<ExecutionError>> {
    let body = api
        .execute(Select(Path::new(F::ENDPOINT)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
    F::decode(body).map_err(tracerr::from_and_wrap!(=> ExecutionError))
}
