//! In-memory [`Api`] used by tests.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
    rc::Rc,
};

use common::operations::{Delete, Insert, Select, Update};
use serde_json::{Map, Value};
use tokio::sync::Notify;
use tracerr::Traced;
use uuid::Uuid;

use super::{Api, Error, Path, Payload};

/// Call observed by a [`Memory`] [`Api`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    /// `GET` of the path.
    Select(String),

    /// `POST` to the path.
    Insert(String),

    /// `PUT` to the path.
    Update(String),

    /// `DELETE` of the path.
    Delete(String),
}

/// Server state behind a [`Memory`] [`Api`].
#[derive(Debug, Default)]
struct Server {
    /// Records of every collection, by endpoint.
    collections: HashMap<String, Vec<Value>>,

    /// Endpoints whose `GET` returns a single record (or `null`).
    singletons: HashSet<String>,

    /// Fixed documents returned by any verb, by path.
    documents: HashMap<String, Value>,

    /// Failures returned by the next calls, in order.
    failures: VecDeque<Error>,

    /// Log of every call, in order.
    calls: Vec<Call>,

    /// Gate every call waits on before responding, if any.
    gate: Option<Rc<Notify>>,
}

/// In-memory [`Api`] emulating the content server.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Rc<RefCell<Server>>);

impl Memory {
    /// Adds a collection served at the provided endpoint.
    pub(crate) fn with_collection(
        self,
        endpoint: &str,
        records: impl IntoIterator<Item = Value>,
    ) -> Self {
        drop(
            self.0
                .borrow_mut()
                .collections
                .insert(endpoint.to_owned(), records.into_iter().collect()),
        );
        self
    }

    /// Adds a singleton document served at the provided endpoint.
    pub(crate) fn with_singleton(self, endpoint: &str) -> Self {
        {
            let mut server = self.0.borrow_mut();
            _ = server.singletons.insert(endpoint.to_owned());
            _ = server
                .collections
                .entry(endpoint.to_owned())
                .or_default();
        }
        self
    }

    /// Adds a fixed document served at the provided path.
    pub(crate) fn with_document(self, path: &str, document: Value) -> Self {
        drop(
            self.0
                .borrow_mut()
                .documents
                .insert(path.to_owned(), document),
        );
        self
    }

    /// Makes the next call fail with the provided status and body.
    pub(crate) fn fail_next(&self, status: ::http::StatusCode, body: Value) {
        self.0.borrow_mut().failures.push_back(Error::Status {
            status,
            body: Some(body),
        });
    }

    /// Makes every following call wait for the returned [`Notify`] before
    /// responding.
    pub(crate) fn hold(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.0.borrow_mut().gate = Some(Rc::clone(&gate));
        gate
    }

    /// Returns every call observed so far.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    /// Returns the records currently stored under the provided endpoint.
    pub(crate) fn records(&self, endpoint: &str) -> Vec<Value> {
        self.0
            .borrow()
            .collections
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    /// Records the `call` and waits for the gate, then returns the injected
    /// failure, if any.
    async fn enter(&self, call: Call) -> Result<(), Traced<Error>> {
        let gate = {
            let mut server = self.0.borrow_mut();
            server.calls.push(call);
            server.gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.0.borrow_mut().failures.pop_front() {
            Some(err) => Err(tracerr::new!(err)),
            None => Ok(()),
        }
    }
}

/// Splits a member path into its collection endpoint and ID.
fn split_member(path: &Path) -> Option<(&str, &str)> {
    path.as_ref().rsplit_once('/').filter(|(e, id)| {
        !e.is_empty() && !id.is_empty()
    })
}

/// Returns the `404 Not Found` [`Error`].
fn not_found() -> Traced<Error> {
    tracerr::new!(Error::Status {
        status: ::http::StatusCode::NOT_FOUND,
        body: Some(serde_json::json!({"message": "Not found"})),
    })
}

/// Returns the ID of the provided stored record.
fn id_of(record: &Value) -> Option<&str> {
    record.get("_id").and_then(Value::as_str)
}

impl Api<Select<Path>> for Memory {
    type Ok = Value;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(path): Select<Path>,
    ) -> Result<Self::Ok, Self::Err> {
        self.enter(Call::Select(path.to_string())).await?;

        let server = self.0.borrow();
        let key = path.as_ref();
        if let Some(doc) = server.documents.get(key) {
            return Ok(doc.clone());
        }
        let records = server.collections.get(key).ok_or_else(not_found)?;
        Ok(if server.singletons.contains(key) {
            records.first().cloned().unwrap_or(Value::Null)
        } else {
            Value::Array(records.clone())
        })
    }
}

impl Api<Insert<Payload>> for Memory {
    type Ok = Value;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(Payload { path, body }): Insert<Payload>,
    ) -> Result<Self::Ok, Self::Err> {
        self.enter(Call::Insert(path.to_string())).await?;

        let mut server = self.0.borrow_mut();
        if let Some(doc) = server.documents.get(path.as_ref()) {
            return Ok(doc.clone());
        }
        let records =
            server.collections.get_mut(path.as_ref()).ok_or_else(not_found)?;

        let mut record = match body {
            Value::Object(fields) => fields,
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => Map::new(),
        };
        drop(record.insert(
            "_id".to_owned(),
            Value::String(Uuid::new_v4().simple().to_string()),
        ));
        let record = Value::Object(record);
        records.push(record.clone());
        Ok(record)
    }
}

impl Api<Update<Payload>> for Memory {
    type Ok = Value;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(Payload { path, body }): Update<Payload>,
    ) -> Result<Self::Ok, Self::Err> {
        self.enter(Call::Update(path.to_string())).await?;

        let (endpoint, id) = split_member(&path).ok_or_else(not_found)?;
        let mut server = self.0.borrow_mut();
        let record = server
            .collections
            .get_mut(endpoint)
            .and_then(|rs| rs.iter_mut().find(|r| id_of(r) == Some(id)))
            .ok_or_else(not_found)?;
        if let (Value::Object(stored), Value::Object(fields)) = (&mut *record, body)
        {
            stored.extend(fields);
        }
        Ok(record.clone())
    }
}

impl Api<Delete<Path>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(path): Delete<Path>,
    ) -> Result<Self::Ok, Self::Err> {
        self.enter(Call::Delete(path.to_string())).await?;

        let (endpoint, id) = split_member(&path).ok_or_else(not_found)?;
        let mut server = self.0.borrow_mut();
        let records =
            server.collections.get_mut(endpoint).ok_or_else(not_found)?;
        let before = records.len();
        records.retain(|r| id_of(r) != Some(id));
        if records.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
