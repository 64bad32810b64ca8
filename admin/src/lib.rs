//! Core of the portfolio admin console: session guarding and the content
//! lifecycle shared by every managed content type.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod confirm;
pub mod context;
pub mod controller;
pub mod domain;
pub mod infra;
pub mod state;

use crate::{
    controller::{Collection, Singleton, Viewer},
    domain::{Inbox, Schema, Session},
    infra::Transport,
};

pub use self::{command::Command, context::Sessions};

/// Admin console.
///
/// Hands out page controllers bound to the same API and [`Sessions`].
#[derive(Clone, Debug)]
pub struct Console<A> {
    /// API of this [`Console`].
    api: A,

    /// [`Sessions`] of this [`Console`].
    sessions: Sessions,
}

impl<A: Transport> Console<A> {
    /// Creates a new [`Console`] with the provided parameters.
    #[must_use]
    pub fn new(api: A, sessions: Sessions) -> Self {
        Self { api, sessions }
    }

    /// Returns the API of this [`Console`].
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns the [`Sessions`] of this [`Console`].
    #[must_use]
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Returns the current [`Session`], if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.sessions.get()
    }

    /// Mounts a new [`Collection`] page of the provided [`Schema`].
    #[must_use]
    pub fn collection(&self, schema: &'static Schema) -> Collection<A> {
        Collection::new(schema, self.api.clone())
    }

    /// Mounts a new [`Singleton`] page of the provided [`Schema`].
    #[must_use]
    pub fn singleton(&self, schema: &'static Schema) -> Singleton<A> {
        Singleton::new(schema, self.api.clone())
    }

    /// Mounts a new [`Viewer`] page of the contact [`Inbox`].
    #[must_use]
    pub fn inbox(&self) -> Viewer<Inbox, A> {
        Viewer::new(self.api.clone())
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        command::{AuthorizeNavigation, LogIn, Navigation},
        domain::{schema::SKILLS, session::Password, Route},
        infra::{api::memory::Memory, storage},
        Command as _, Console, Sessions,
    };

    #[tokio::test]
    async fn login_then_manage_collection() {
        let api = Memory::default()
            .with_document("/auth/login", json!({"token": "abc", "user": null}))
            .with_collection("/skills", [json!({"_id": "a", "name": "Rust"})]);
        let console = Console::new(api, Sessions::new(storage::Memory::default()));

        let nav = console
            .execute(AuthorizeNavigation { route: Route::Skills })
            .await
            .unwrap();
        assert_eq!(nav, Navigation::Redirect(Route::Login));

        _ = console
            .execute(LogIn {
                email: "ada@example.com".into(),
                password: secrecy::SecretBox::new(Box::new(Password::from("pw"))),
            })
            .await
            .unwrap();
        let nav = console
            .execute(AuthorizeNavigation { route: Route::Skills })
            .await
            .unwrap();
        assert_eq!(nav, Navigation::Render(Route::Skills));

        let page = console.collection(&SKILLS);
        page.load().await.unwrap();
        page.draft_mut().set("name", "Go").unwrap();
        _ = page.create().await.unwrap();

        assert_eq!(page.state().records.len(), 2);
        assert!(console.session().is_some());
    }
}
