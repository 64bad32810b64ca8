//! [`Collection`] controller.

use std::{
    cell::{Ref, RefMut},
    future::Future,
    rc::Rc,
};

use common::operations::{Delete, Insert, Select};
use serde_json::{Map, Value};
use tracerr::Traced;
use tracing as log;

use crate::{
    confirm::{Confirm, Decision},
    domain::{record::Id, Record, Schema},
    infra::{
        api::{Path, Payload},
        Transport,
    },
    state::{Draft, List},
};

use super::{Alert, Banner, ExecutionError, Page};

/// State of a [`Collection`] page.
#[derive(Debug)]
pub struct State {
    /// Last successfully loaded [`Record`]s.
    pub records: List<Record>,

    /// Create form.
    pub draft: Draft,

    /// Indicates whether a load is in flight.
    pub loading: bool,

    /// Indicates whether a create is in flight.
    pub saving: bool,

    /// Inline error of the last failed load or create.
    pub banner: Option<Banner>,

    /// Error of the last failed delete, until dismissed.
    pub alert: Option<Alert>,
}

/// Outcome of a [`Collection::remove()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Removal {
    /// Record was deleted.
    Removed,

    /// Operator declined the deletion, nothing was sent.
    Declined,
}

/// Controller of a collection page: lists, creates and deletes [`Record`]s
/// of a single [`Schema`].
#[derive(Debug)]
pub struct Collection<A> {
    /// [`Schema`] of the managed [`Record`]s.
    schema: &'static Schema,

    /// API the [`Record`]s are managed through.
    api: A,

    /// State of this page.
    page: Rc<Page<State>>,
}

impl<A: Transport> Collection<A> {
    /// Creates a new [`Collection`] controller of the provided [`Schema`].
    ///
    /// Nothing is fetched until [`Collection::load()`] is called.
    #[must_use]
    pub fn new(schema: &'static Schema, api: A) -> Self {
        Self {
            schema,
            api,
            page: Rc::new(Page::new(State::new(schema))),
        }
    }

    /// Returns the [`Schema`] of this [`Collection`].
    #[must_use]
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Borrows the current [`State`] of this page.
    #[must_use]
    pub fn state(&self) -> Ref<'_, State> {
        self.page.state()
    }

    /// Mutably borrows the create form of this page.
    #[must_use]
    pub fn draft_mut(&self) -> RefMut<'_, Draft> {
        RefMut::map(self.page.state_mut(), |s| &mut s.draft)
    }

    /// Dismisses the current [`Alert`], if any.
    pub fn dismiss_alert(&self) {
        self.page.now(|s| s.alert = None);
    }

    /// Fetches the [`Record`]s, replacing the listed ones wholesale.
    ///
    /// On failure the listed [`Record`]s are left intact and a [`Banner`] is
    /// shown.
    pub fn load(
        &self,
    ) -> impl Future<Output = Result<(), Traced<ExecutionError>>> + 'static
    {
        load(self.schema, self.api.clone(), Rc::clone(&self.page))
    }

    /// Submits the current [`Draft`] as a new [`Record`] and reloads the
    /// list.
    ///
    /// On failure the [`Draft`] is kept, so no input is lost.
    pub fn create(
        &self,
    ) -> impl Future<Output = Result<Record, Traced<ExecutionError>>> + 'static
    {
        create(self.schema, self.api.clone(), Rc::clone(&self.page))
    }

    /// Deletes the [`Record`] with the provided [`Id`] once the operator
    /// confirms it.
    ///
    /// On failure the [`Record`] stays listed and an [`Alert`] is raised.
    pub fn remove(
        &self,
        id: Id,
        confirm: &impl Confirm,
    ) -> impl Future<Output = Result<Removal, Traced<ExecutionError>>> + 'static
    {
        let decision = confirm.confirm(self.schema.removal_prompt());
        let (schema, api, page) =
            (self.schema, self.api.clone(), Rc::clone(&self.page));
        async move {
            if decision.await == Decision::Declined {
                log::debug!(%id, "deletion of `{}` declined", schema.singular);
                return Ok(Removal::Declined);
            }
            remove(schema, api, page, id).await.map(|()| Removal::Removed)
        }
    }
}

impl<A> Drop for Collection<A> {
    fn drop(&mut self) {
        self.page.unmount();
    }
}

impl State {
    /// Creates a new initial [`State`] of the provided [`Schema`] page.
    fn new(schema: &'static Schema) -> Self {
        Self {
            records: List::default(),
            draft: Draft::new(schema),
            loading: true,
            saving: false,
            banner: None,
            alert: None,
        }
    }
}

/// Loads the [`Record`]s of the provided [`Schema`] into the [`Page`].
fn load<A: Transport>(
    schema: &'static Schema,
    api: A,
    page: Rc<Page<State>>,
) -> impl Future<Output = Result<(), Traced<ExecutionError>>> + 'static {
    page.now(|s| s.loading = true);

    async move {
        let res = fetch(schema, &api).await;

        _ = page.settle(|s| {
            s.loading = false;
            match &res {
                Ok(records) => s.records.replace(records.clone()),
                Err(e) => {
                    log::error!("failed to load `{}`: {e}", schema.plural);
                    s.banner = Some(Banner::new(format!(
                        "Failed to load {}",
                        schema.plural,
                    )));
                }
            }
        });
        res.map(drop)
    }
}

/// Fetches every [`Record`] of the provided [`Schema`].
async fn fetch<A: Transport>(
    schema: &'static Schema,
    api: &A,
) -> Result<Vec<Record>, Traced<ExecutionError>> {
    let body = api
        .execute(Select(Path::new(schema.endpoint)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
    if body.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(body)
        .map_err(tracerr::from_and_wrap!(=> ExecutionError))
}

/// Creates a new [`Record`] from the [`Page`]'s [`Draft`].
fn create<A: Transport>(
    schema: &'static Schema,
    api: A,
    page: Rc<Page<State>>,
) -> impl Future<Output = Result<Record, Traced<ExecutionError>>> + 'static {
    let body = page.now(|s| {
        s.banner = None;
        s.saving = true;
        s.draft.serialize()
    });

    async move {
        let res = insert(schema, &api, body).await;

        let settled = page.settle(|s| {
            s.saving = false;
            match &res {
                Ok(record) => {
                    log::info!(id = %record.id, "`{}` created", schema.singular);
                    s.draft.reset();
                }
                Err(e) => {
                    log::error!("failed to create `{}`: {e}", schema.singular);
                    s.banner = Some(Banner::new(format!(
                        "Failed to create {}",
                        schema.singular,
                    )));
                }
            }
        });

        if settled.is_some() && res.is_ok() {
            // Failure is reported by the load itself.
            _ = load(schema, api, page).await;
        }
        res
    }
}

/// Sends a new [`Record`] of the provided [`Schema`] to the API.
async fn insert<A: Transport>(
    schema: &'static Schema,
    api: &A,
    body: Map<String, Value>,
) -> Result<Record, Traced<ExecutionError>> {
    let created = api
        .execute(Insert(Payload::new(
            Path::new(schema.endpoint),
            Value::Object(body),
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
    serde_json::from_value(created)
        .map_err(tracerr::from_and_wrap!(=> ExecutionError))
}

/// Deletes the [`Record`] with the provided [`Id`] from the [`Page`].
async fn remove<A: Transport>(
    schema: &'static Schema,
    api: A,
    page: Rc<Page<State>>,
    id: Id,
) -> Result<(), Traced<ExecutionError>> {
    let res = api
        .execute(Delete(Path::new(schema.endpoint).member(&id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> ExecutionError));

    _ = page.settle(|s| match &res {
        Ok(()) => {
            log::info!(%id, "`{}` deleted", schema.singular);
            _ = s.records.exclude(&id);
        }
        Err(e) => {
            log::error!(%id, "failed to delete `{}`: {e}", schema.singular);
            s.alert = Some(Alert::new(format!(
                "Failed to delete {}",
                schema.singular,
            )));
        }
    });
    res
}

#[cfg(test)]
mod spec {
    use std::{cell::RefCell, future, rc::Rc};

    use http::StatusCode;
    use serde_json::{json, Value};

    use crate::{
        confirm::{self, Decision},
        domain::schema::{PROJECTS, SKILLS},
        infra::api::memory::{Call, Memory},
    };

    use super::{Collection, Removal};

    fn skill(id: &str, name: &str) -> Value {
        json!({"_id": id, "name": name, "level": "Advanced"})
    }

    fn skills(api: &Memory) -> Collection<Memory> {
        Collection::new(&SKILLS, api.clone())
    }

    #[tokio::test]
    async fn loads_records_in_server_order() {
        let api = Memory::default()
            .with_collection("/skills", [skill("b", "Go"), skill("a", "Rust")]);
        let page = skills(&api);
        assert!(page.state().loading);

        page.load().await.unwrap();

        let state = page.state();
        assert!(!state.loading);
        assert!(state.banner.is_none());
        let ids = state.records.iter().map(|r| r.id.as_ref()).collect::<Vec<&str>>();
        assert_eq!(ids, ["b", "a"]);
    }

    #[tokio::test]
    async fn failed_first_load_shows_banner_and_empty_list() {
        let api = Memory::default().with_collection("/skills", []);
        api.fail_next(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        let page = skills(&api);

        assert!(page.load().await.is_err());

        let state = page.state();
        assert!(!state.loading);
        assert!(state.records.is_empty());
        assert_eq!(
            state.banner.as_ref().map(AsRef::as_ref),
            Some("Failed to load skills"),
        );
    }

    #[tokio::test]
    async fn failed_reload_keeps_last_good_list() {
        let api = Memory::default().with_collection("/skills", [skill("a", "Rust")]);
        let page = skills(&api);
        page.load().await.unwrap();

        api.fail_next(StatusCode::BAD_GATEWAY, json!({}));
        assert!(page.load().await.is_err());

        let state = page.state();
        assert!(!state.loading);
        assert_eq!(state.records.len(), 1);
        assert!(state.banner.is_some());
    }

    #[tokio::test]
    async fn created_record_is_listed_exactly_once() {
        let api = Memory::default().with_collection("/skills", [skill("a", "Rust")]);
        let page = skills(&api);
        page.load().await.unwrap();

        page.draft_mut().set("name", "Go").unwrap();
        let created = page.create().await.unwrap();

        let state = page.state();
        assert_eq!(state.records.len(), 2);
        assert_eq!(
            state.records.iter().filter(|r| r.id == created.id).count(),
            1,
        );
        assert_eq!(
            state.draft.get("name").and_then(|i| i.as_text()),
            Some(""),
        );
        assert!(!state.saving);
        assert_eq!(
            api.calls(),
            [
                Call::Select("/skills".into()),
                Call::Insert("/skills".into()),
                Call::Select("/skills".into()),
            ],
        );
    }

    #[tokio::test]
    async fn create_serializes_list_fields() {
        let api = Memory::default().with_collection("/projects", []);
        let page = Collection::new(&PROJECTS, api.clone());

        {
            let mut draft = page.draft_mut();
            draft.set("title", "Folio").unwrap();
            draft.set("techStack", "rust, tokio ,, serde").unwrap();
        }
        _ = page.create().await.unwrap();

        let stored = api.records("/projects");
        assert_eq!(stored[0]["techStack"], json!(["rust", "tokio", "serde"]));
    }

    #[tokio::test]
    async fn failed_create_keeps_draft() {
        let api = Memory::default().with_collection("/skills", []);
        let page = skills(&api);
        page.draft_mut().set("name", "Go").unwrap();

        api.fail_next(StatusCode::BAD_REQUEST, json!({"message": "nope"}));
        let err = page.create().await.unwrap_err();
        assert_eq!(err.as_ref().message(), Some("nope"));

        let state = page.state();
        assert_eq!(
            state.draft.get("name").and_then(|i| i.as_text()),
            Some("Go"),
        );
        assert_eq!(
            state.banner.as_ref().map(AsRef::as_ref),
            Some("Failed to create skill"),
        );
        assert_eq!(api.calls(), [Call::Insert("/skills".into())]);
    }

    #[tokio::test]
    async fn declined_removal_sends_nothing() {
        let api = Memory::default().with_collection("/skills", [skill("a", "Rust")]);
        let page = skills(&api);
        page.load().await.unwrap();

        let removal = page.remove("a".into(), &Decision::Declined).await;

        assert_eq!(removal.unwrap(), Removal::Declined);
        assert_eq!(page.state().records.len(), 1);
        assert_eq!(api.calls(), [Call::Select("/skills".into())]);
    }

    #[tokio::test]
    async fn confirmed_removal_deletes_once() {
        let api = Memory::default()
            .with_collection("/skills", [skill("a", "Rust"), skill("b", "Go")]);
        let page = skills(&api);
        page.load().await.unwrap();

        let (request, pending) = confirm::request("");
        let confirm = RefCell::new(Some(pending));
        let removal = page.remove("a".into(), &Prompted(confirm));
        request.resolve(Decision::Confirmed);

        assert_eq!(removal.await.unwrap(), Removal::Removed);
        let ids = page
            .state()
            .records
            .iter()
            .map(|r| r.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["b"]);
        assert_eq!(
            api.calls(),
            [Call::Select("/skills".into()), Call::Delete("/skills/a".into())],
        );
    }

    #[tokio::test]
    async fn removal_asks_with_record_name() {
        let api = Memory::default().with_collection("/skills", [skill("a", "Rust")]);
        let page = skills(&api);

        let asked = Rc::new(RefCell::new(Vec::new()));
        let confirm = Recorder(Rc::clone(&asked));
        _ = page.remove("a".into(), &confirm).await.unwrap();

        assert_eq!(*asked.borrow(), ["Delete this skill?"]);
    }

    #[tokio::test]
    async fn failed_removal_raises_alert() {
        let api = Memory::default().with_collection("/skills", [skill("a", "Rust")]);
        let page = skills(&api);
        page.load().await.unwrap();

        assert!(page.remove("zz".into(), &Decision::Confirmed).await.is_err());

        {
            let state = page.state();
            assert_eq!(state.records.len(), 1);
            assert_eq!(
                state.alert.as_ref().map(AsRef::as_ref),
                Some("Failed to delete skill"),
            );
        }
        page.dismiss_alert();
        assert!(page.state().alert.is_none());
    }

    #[tokio::test]
    async fn unmounted_page_ignores_late_responses() {
        let api = Memory::default().with_collection("/skills", []);
        let page = skills(&api);
        page.draft_mut().set("name", "Go").unwrap();

        let gate = api.hold();
        let create = page.create();
        let page_state = Rc::clone(&page.page);
        drop(page);
        gate.notify_one();
        _ = create.await.unwrap();

        let state = page_state.state();
        assert_eq!(
            state.draft.get("name").and_then(|i| i.as_text()),
            Some("Go"),
        );
        assert_eq!(api.calls(), [Call::Insert("/skills".into())]);
    }

    #[tokio::test]
    async fn unmounted_page_keeps_records_after_late_removal() {
        let api = Memory::default()
            .with_collection("/skills", [skill("a", "Rust"), skill("b", "Go")]);
        let page = skills(&api);
        page.load().await.unwrap();

        let gate = api.hold();
        let removal = page.remove("a".into(), &Decision::Confirmed);
        let page_state = Rc::clone(&page.page);
        drop(page);
        gate.notify_one();
        assert_eq!(removal.await.unwrap(), Removal::Removed);

        let state = page_state.state();
        assert_eq!(state.records.len(), 2);
        assert!(state.alert.is_none());
        assert_eq!(
            api.calls(),
            [Call::Select("/skills".into()), Call::Delete("/skills/a".into())],
        );
        assert_eq!(api.records("/skills").len(), 1);
    }

    /// [`Confirm`] resolving with a [`confirm::Pending`] handed out once.
    ///
    /// [`Confirm`]: crate::confirm::Confirm
    struct Prompted(RefCell<Option<confirm::Pending>>);

    impl confirm::Confirm for Prompted {
        fn confirm(&self, _: String) -> confirm::Pending {
            self.0.borrow_mut().take().unwrap()
        }
    }

    /// [`Confirm`] recording every prompt and confirming it.
    ///
    /// [`Confirm`]: crate::confirm::Confirm
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl confirm::Confirm for Recorder {
        fn confirm(&self, prompt: String) -> confirm::Pending {
            self.0.borrow_mut().push(prompt);
            confirm::Pending::new(future::ready(Decision::Confirmed))
        }
    }
}
