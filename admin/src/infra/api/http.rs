//! HTTP [`Api`] implementation.

use std::time::Duration;

use common::operations::{Delete, Insert, Select, Update};
use reqwest::Method;
use serde_json::Value;
use tracerr::Traced;
use tracing as log;
use uuid::Uuid;

use crate::Sessions;

use super::{Api, Error, Path, Payload};

/// [`Http`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL every [`Path`] is resolved against.
    pub base_url: String,

    /// Timeout of a single request.
    ///
    /// [`None`] leaves it to the HTTP client defaults.
    pub timeout: Option<Duration>,
}

/// [`Api`] talking to the content server over HTTP.
///
/// Attaches the token of the current [`Session`] (if any) to every request.
///
/// [`Session`]: crate::domain::Session
#[derive(Clone, Debug)]
pub struct Http {
    /// Normalized base URL, without a trailing `/`.
    base_url: String,

    /// Timeout of a single request.
    timeout: Option<Duration>,

    /// Underlying HTTP client.
    client: reqwest::Client,

    /// [`Sessions`] the bearer token is read from.
    sessions: Sessions,
}

impl Http {
    /// Creates a new [`Http`] [`Api`] from the provided [`Config`].
    ///
    /// # Errors
    ///
    /// Errors if the configured base URL is blank.
    pub fn new(config: Config, sessions: Sessions) -> Result<Self, Traced<Error>> {
        let Config { base_url, timeout } = config;

        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(tracerr::new!(Error::Transport(
                "API base URL is not configured".to_owned(),
            )));
        }

        Ok(Self {
            base_url: base_url.to_owned(),
            timeout,
            client: reqwest::Client::new(),
            sessions,
        })
    }

    /// Returns the absolute URL of the provided [`Path`].
    #[must_use]
    pub fn endpoint(&self, path: &Path) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and decodes its JSON response.
    ///
    /// An empty response body is decoded as [`Value::Null`].
    async fn send(
        &self,
        method: Method,
        path: &Path,
        body: Option<&Value>,
    ) -> Result<Value, Traced<Error>> {
        let request_id = format!("req_{}", Uuid::new_v4().simple());
        log::debug!(%method, %path, %request_id, "sending API request");

        let mut request = self
            .client
            .request(method, self.endpoint(path))
            .header("x-request-id", &request_id);
        if let Some(token) = self.sessions.token() {
            request = request.bearer_auth(token.as_ref());
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| tracerr::new!(Error::Transport(e.to_string())))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| tracerr::new!(Error::Transport(e.to_string())))?;

        if !status.is_success() {
            let err = Error::Status {
                status,
                body: serde_json::from_slice(&bytes).ok(),
            };
            if err.is_unauthorized() {
                log::warn!(
                    %path,
                    "API rejected the session token, log in again",
                );
            }
            return Err(tracerr::new!(err));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Api<Select<Path>> for Http {
    type Ok = Value;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(path): Select<Path>,
    ) -> Result<Self::Ok, Self::Err> {
        self.send(Method::GET, &path, None).await
    }
}

impl Api<Insert<Payload>> for Http {
    type Ok = Value;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(payload): Insert<Payload>,
    ) -> Result<Self::Ok, Self::Err> {
        self.send(Method::POST, &payload.path, Some(&payload.body))
            .await
    }
}

impl Api<Update<Payload>> for Http {
    type Ok = Value;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(payload): Update<Payload>,
    ) -> Result<Self::Ok, Self::Err> {
        self.send(Method::PUT, &payload.path, Some(&payload.body))
            .await
    }
}

impl Api<Delete<Path>> for Http {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(path): Delete<Path>,
    ) -> Result<Self::Ok, Self::Err> {
        self.send(Method::DELETE, &path, None).await.map(drop)
    }
}
