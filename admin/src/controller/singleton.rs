//! [`Singleton`] controller.

use std::{
    cell::{Ref, RefMut},
    future::Future,
    rc::Rc,
};

use common::operations::{Insert, Select, Update};
use serde_json::{Map, Value};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{record::Id, Record, Schema},
    infra::{
        api::{Path, Payload},
        Transport,
    },
    state::Draft,
};

use super::{Banner, ExecutionError, Page};

/// Whether the document of a [`Singleton`] exists on the server yet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Persistence {
    /// Nothing is stored yet: saving creates the document.
    #[default]
    Draft,

    /// Document is stored under the [`Id`]: saving updates it in place.
    Persisted(Id),
}

/// State of a [`Singleton`] page.
#[derive(Debug)]
pub struct State {
    /// [`Persistence`] of the document.
    pub persistence: Persistence,

    /// Edit form of the document.
    pub draft: Draft,

    /// Indicates whether a load is in flight.
    pub loading: bool,

    /// Indicates whether a save is in flight.
    pub saving: bool,

    /// Inline error of the last failed load or save.
    pub banner: Option<Banner>,

    /// Confirmation of the last successful save.
    pub notice: Option<String>,
}

/// Controller of a singleton document page, like the About one.
#[derive(Debug)]
pub struct Singleton<A> {
    /// [`Schema`] of the document.
    schema: &'static Schema,

    /// API the document is managed through.
    api: A,

    /// State of this page.
    page: Rc<Page<State>>,
}

impl<A: Transport> Singleton<A> {
    /// Creates a new [`Singleton`] controller of the provided [`Schema`].
    #[must_use]
    pub fn new(schema: &'static Schema, api: A) -> Self {
        Self {
            schema,
            api,
            page: Rc::new(Page::new(State {
                persistence: Persistence::Draft,
                draft: Draft::new(schema),
                loading: true,
                saving: false,
                banner: None,
                notice: None,
            })),
        }
    }

    /// Borrows the current [`State`] of this page.
    #[must_use]
    pub fn state(&self) -> Ref<'_, State> {
        self.page.state()
    }

    /// Mutably borrows the edit form of this page.
    #[must_use]
    pub fn draft_mut(&self) -> RefMut<'_, Draft> {
        RefMut::map(self.page.state_mut(), |s| &mut s.draft)
    }

    /// Fetches the document into the edit form.
    ///
    /// An absent document leaves the form at its initial values.
    pub fn load(
        &self,
    ) -> impl Future<Output = Result<(), Traced<ExecutionError>>> + 'static
    {
        let (schema, api, page) =
            (self.schema, self.api.clone(), Rc::clone(&self.page));
        page.now(|s| s.loading = true);

        async move {
            let res = fetch(schema, &api).await;

            _ = page.settle(|s| {
                s.loading = false;
                match &res {
                    Ok(Some(record)) => {
                        s.persistence = Persistence::Persisted(record.id.clone());
                        s.draft = Draft::from_fields(schema, &record.fields);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("failed to load `{}`: {e}", schema.title);
                        s.banner = Some(Banner::new(format!(
                            "Failed to load {} content",
                            schema.title,
                        )));
                    }
                }
            });
            res.map(drop)
        }
    }

    /// Saves the edit form: creates the document if it doesn't exist yet,
    /// or updates it in place otherwise.
    ///
    /// Doesn't refetch the document. Only one save may be in flight at a
    /// time: an overlapping one fails with [`ExecutionError::InProgress`]
    /// without sending anything.
    pub fn update(
        &self,
    ) -> impl Future<Output = Result<Id, Traced<ExecutionError>>> + 'static
    {
        let (schema, api, page) =
            (self.schema, self.api.clone(), Rc::clone(&self.page));
        let started = page.now(|s| {
            if s.saving {
                return None;
            }
            s.saving = true;
            s.banner = None;
            s.notice = None;
            Some((s.persistence.clone(), s.draft.serialize()))
        });

        async move {
            let Some((persistence, body)) = started else {
                return Err(tracerr::new!(ExecutionError::InProgress));
            };

            let res = save(schema, &api, persistence, body).await;

            _ = page.settle(|s| {
                s.saving = false;
                match &res {
                    Ok(id) => {
                        log::info!(%id, "`{}` saved", schema.title);
                        s.persistence = Persistence::Persisted(id.clone());
                        s.notice = Some(format!(
                            "{} content saved successfully",
                            schema.title,
                        ));
                    }
                    Err(e) => {
                        log::error!("failed to save `{}`: {e}", schema.title);
                        s.banner = Some(Banner::new(format!(
                            "Failed to save {} content",
                            schema.title,
                        )));
                    }
                }
            });
            res
        }
    }
}

impl<A> Drop for Singleton<A> {
    fn drop(&mut self) {
        self.page.unmount();
    }
}

/// Fetches the document of the provided [`Schema`], if it exists.
///
/// A sequence response yields its first document.
async fn fetch<A: Transport>(
    schema: &'static Schema,
    api: &A,
) -> Result<Option<Record>, Traced<ExecutionError>> {
    let body = api
        .execute(Select(Path::new(schema.endpoint)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
    let body = match body {
        Value::Null => return Ok(None),
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Ok(None),
        },
        other @ (Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Object(_)) => other,
    };
    serde_json::from_value(body)
        .map(Some)
        .map_err(tracerr::from_and_wrap!(=> ExecutionError))
}

/// Stores the document body according to its [`Persistence`], returning
/// its [`Id`].
async fn save<A: Transport>(
    schema: &'static Schema,
    api: &A,
    persistence: Persistence,
    body: Map<String, Value>,
) -> Result<Id, Traced<ExecutionError>> {
    let endpoint = Path::new(schema.endpoint);
    match persistence {
        Persistence::Draft => {
            let created = api
                .execute(Insert(Payload::new(endpoint, Value::Object(body))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
            serde_json::from_value::<Record>(created)
                .map(|r| r.id)
                .map_err(tracerr::from_and_wrap!(=> ExecutionError))
        }
        Persistence::Persisted(id) => {
            _ = api
                .execute(Update(Payload::new(
                    endpoint.member(&id),
                    Value::Object(body),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
            Ok(id)
        }
    }
}

#[cfg(test)]
mod spec {
    use http::StatusCode;
    use serde_json::json;

    use crate::{
        controller::ExecutionError,
        domain::{record::Id, schema::ABOUT},
        infra::api::memory::{Call, Memory},
    };

    use super::{Persistence, Singleton};

    fn about(api: &Memory) -> Singleton<Memory> {
        Singleton::new(&ABOUT, api.clone())
    }

    #[tokio::test]
    async fn absent_document_stays_draft() {
        let api = Memory::default().with_singleton("/about");
        let page = about(&api);

        page.load().await.unwrap();

        let state = page.state();
        assert!(!state.loading);
        assert_eq!(state.persistence, Persistence::Draft);
        assert_eq!(
            state.draft.get("heading").and_then(|i| i.as_text()),
            Some(""),
        );
    }

    #[tokio::test]
    async fn loads_existing_document_for_editing() {
        let api = Memory::default().with_collection(
            "/about",
            [json!({
                "_id": "ab1",
                "heading": "Hi",
                "highlightPoints": ["Rust", "Go"],
            })],
        );
        let page = about(&api);

        page.load().await.unwrap();

        let state = page.state();
        assert_eq!(state.persistence, Persistence::Persisted(Id::from("ab1")));
        assert_eq!(
            state.draft.get("highlightPoints").and_then(|i| i.as_text()),
            Some("Rust\nGo"),
        );
    }

    #[tokio::test]
    async fn first_save_creates_exactly_one_document() {
        let api = Memory::default().with_singleton("/about");
        let page = about(&api);
        page.load().await.unwrap();

        page.draft_mut().set("heading", "Hello").unwrap();
        let id = page.update().await.unwrap();
        page.draft_mut().set("heading", "Hello again").unwrap();
        assert_eq!(page.update().await.unwrap(), id);

        let stored = api.records("/about");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["heading"], "Hello again");
        assert_eq!(
            api.calls(),
            [
                Call::Select("/about".into()),
                Call::Insert("/about".into()),
                Call::Update(format!("/about/{id}")),
            ],
        );

        let reloaded = about(&api);
        reloaded.load().await.unwrap();
        assert_eq!(reloaded.state().persistence, Persistence::Persisted(id));
    }

    #[tokio::test]
    async fn save_reports_outcome() {
        let api = Memory::default().with_singleton("/about");
        let page = about(&api);

        _ = page.update().await.unwrap();
        assert_eq!(
            page.state().notice.as_deref(),
            Some("About content saved successfully"),
        );

        api.fail_next(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        assert!(page.update().await.is_err());
        let state = page.state();
        assert!(state.notice.is_none());
        assert_eq!(
            state.banner.as_ref().map(AsRef::as_ref),
            Some("Failed to save About content"),
        );
        assert!(!state.saving);
    }

    #[tokio::test]
    async fn failed_load_shows_banner() {
        let api = Memory::default().with_singleton("/about");
        api.fail_next(StatusCode::BAD_GATEWAY, json!({}));
        let page = about(&api);

        assert!(page.load().await.is_err());

        let state = page.state();
        assert!(!state.loading);
        assert_eq!(
            state.banner.as_ref().map(AsRef::as_ref),
            Some("Failed to load About content"),
        );
    }

    #[tokio::test]
    async fn overlapping_save_is_rejected() {
        let api = Memory::default().with_singleton("/about");
        let page = about(&api);

        let gate = api.hold();
        let first = page.update();
        let second = page.update();

        let err = second.await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::InProgress));

        gate.notify_one();
        _ = first.await.unwrap();
        assert_eq!(api.records("/about").len(), 1);
    }
}
