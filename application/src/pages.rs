//! Console pages: every [`args::Command`] rendered as a page visit.

use std::{
    io::{self, BufRead as _, Write},
    ptr,
};

use admin::{
    command::{AuthorizeNavigation, LogIn, LogOut, Navigation},
    confirm::{Confirm, Decision},
    controller::collection::Removal,
    domain::{
        record::Id,
        schema::{self, Schema},
        session::Password,
        Route,
    },
    infra::Transport,
    state::Draft,
    Command as _, Console,
};
use futures::future;
use itertools::Itertools as _;
use secrecy::SecretBox;
use tracing as log;

use crate::{
    args::{self, Assignment},
    confirm::Terminal,
    render, Error,
};

/// Visits the page of the provided [`args::Command`], writing it into `out`.
///
/// # Errors
///
/// If the page cannot be shown or its action fails.
pub async fn visit<A: Transport>(
    console: &Console<A>,
    command: args::Command,
    out: &mut impl Write,
) -> Result<(), Error> {
    use args::Command as C;

    match command {
        C::Login { email, password } => login(console, email, password, out).await,
        C::Logout => {
            console
                .execute(LogOut)
                .await
                .map_err(|e| Error::failed("Failed to log out", e))?;
            writeln!(out, "Logged out").map_err(Into::into)
        }
        C::Whoami => {
            render::session(out, console.session().as_ref()).map_err(Into::into)
        }
        C::Dashboard => {
            guard(console, Route::Dashboard).await?;
            dashboard(console, out).await
        }
        C::List { collection } => {
            let schema = collection_schema(collection)?;
            guard(console, collection).await?;
            let page = console.collection(schema);
            let loaded = page.load().await;
            render::collection(out, schema, &page.state())?;
            loaded.map_err(|e| Error::failed(format!("Failed to load {}", schema.plural), e))
        }
        C::Create { collection, set } => {
            let schema = collection_schema(collection)?;
            guard(console, collection).await?;
            create(console, schema, &set, out).await
        }
        C::Delete {
            collection,
            id,
            yes,
        } => {
            let schema = collection_schema(collection)?;
            guard(console, collection).await?;
            if yes {
                delete(console, schema, id.into(), &Decision::Confirmed, out).await
            } else {
                delete(console, schema, id.into(), &Terminal, out).await
            }
        }
        C::About { set } => {
            guard(console, Route::About).await?;
            about(console, &set, out).await
        }
        C::Messages { select } => {
            guard(console, Route::Messages).await?;
            messages(console, select.map(Id::from), out).await
        }
    }
}

/// Passes the navigation to the provided [`Route`] through the session
/// guard.
async fn guard<A: Transport>(
    console: &Console<A>,
    route: Route,
) -> Result<(), Error> {
    match console.execute(AuthorizeNavigation { route }).await {
        Ok(Navigation::Render(_)) => Ok(()),
        Ok(Navigation::Redirect(_)) => Err(Error::Unauthenticated),
        Err(never) => match never {},
    }
}

/// Returns the [`Schema`] of the provided collection [`Route`].
fn collection_schema(route: Route) -> Result<&'static Schema, Error> {
    schema::COLLECTIONS
        .iter()
        .copied()
        .find(|s| route.schema().is_some_and(|r| ptr::eq(r, *s)))
        .ok_or_else(|| {
            Error::Input(format!(
                "`{route}` is not a content collection, expected one of: {}",
                schema::COLLECTIONS
                    .iter()
                    .map(|s| s.endpoint.trim_start_matches('/'))
                    .join(", "),
            ))
        })
}

/// Applies the provided [`Assignment`]s to the [`Draft`].
fn fill(draft: &mut Draft, set: &[Assignment]) -> Result<(), Error> {
    for Assignment { field, value } in set {
        draft
            .parse(field, value)
            .map_err(|e| Error::Input(e.to_string()))?;
    }
    let missing = draft.missing();
    if !missing.is_empty() {
        return Err(Error::Input(format!(
            "Required fields are missing: {}",
            missing.iter().map(|f| f.name).join(", "),
        )));
    }
    Ok(())
}

/// Logs the operator in, prompting for missing credentials.
async fn login<A: Transport>(
    console: &Console<A>,
    email: Option<String>,
    password: Option<String>,
    out: &mut impl Write,
) -> Result<(), Error> {
    let email = match email {
        Some(email) => email,
        None => {
            write!(out, "Email: ")?;
            out.flush()?;
            let mut line = String::new();
            _ = io::stdin().lock().read_line(&mut line)?;
            line.trim().to_owned()
        }
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let session = console
        .execute(LogIn {
            email,
            password: SecretBox::new(Box::new(Password::from(password))),
        })
        .await
        .map_err(|e| {
            let message = e.as_ref().message().to_owned();
            Error::failed(message, e)
        })?;

    render::session(out, Some(&session)).map_err(Into::into)
}

/// Shows the operator and the number of records of every content type.
///
/// Every content type is loaded concurrently: one failing doesn't affect the
/// others.
async fn dashboard<A: Transport>(
    console: &Console<A>,
    out: &mut impl Write,
) -> Result<(), Error> {
    let pages = schema::COLLECTIONS
        .iter()
        .copied()
        .map(|schema| console.collection(schema))
        .collect::<Vec<_>>();
    let inbox = console.inbox();

    let (loaded, inbox_loaded) = future::join(
        future::join_all(pages.iter().map(|p| p.load())),
        inbox.load(),
    )
    .await;

    let mut counts = pages
        .iter()
        .zip(loaded)
        .map(|(page, res)| render::Count {
            title: page.schema().title,
            total: res.ok().map(|()| page.state().records.len()),
        })
        .collect::<Vec<_>>();
    counts.push(render::Count {
        title: "Messages",
        total: inbox_loaded.ok().map(|()| inbox.state().items.len()),
    });

    render::dashboard(out, console.session().as_ref(), &counts)?;
    Ok(())
}

/// Creates a new record of the provided [`Schema`].
async fn create<A: Transport>(
    console: &Console<A>,
    schema: &'static Schema,
    set: &[Assignment],
    out: &mut impl Write,
) -> Result<(), Error> {
    let page = console.collection(schema);
    fill(&mut page.draft_mut(), set)?;

    let record = page.create().await.map_err(|e| {
        Error::failed(format!("Failed to create {}", schema.singular), e)
    })?;

    writeln!(out, "Created {} {}", schema.singular, record.id)?;
    render::collection(out, schema, &page.state())?;
    Ok(())
}

/// Deletes the record with the provided [`Id`] after confirmation.
async fn delete<A: Transport>(
    console: &Console<A>,
    schema: &'static Schema,
    id: Id,
    confirm: &impl Confirm,
    out: &mut impl Write,
) -> Result<(), Error> {
    let page = console.collection(schema);

    let removal = page.remove(id.clone(), confirm).await.map_err(|e| {
        Error::failed(format!("Failed to delete {}", schema.singular), e)
    })?;

    match removal {
        Removal::Removed => writeln!(out, "Deleted {} {id}", schema.singular)?,
        Removal::Declined => {
            log::debug!(%id, "deletion declined");
            writeln!(out, "Nothing deleted")?;
        }
    }
    Ok(())
}

/// Shows the About content, saving it first if any field is set.
async fn about<A: Transport>(
    console: &Console<A>,
    set: &[Assignment],
    out: &mut impl Write,
) -> Result<(), Error> {
    let page = console.singleton(&schema::ABOUT);
    if let Err(e) = page.load().await {
        render::singleton(out, &page.state())?;
        return Err(Error::failed("Failed to load About content", e));
    }

    if !set.is_empty() {
        fill(&mut page.draft_mut(), set)?;
        let saved = page.update().await;
        render::singleton(out, &page.state())?;
        return saved
            .map(drop)
            .map_err(|e| Error::failed("Failed to save About content", e));
    }

    render::singleton(out, &page.state())?;
    Ok(())
}

/// Lists the contact messages, showing the selected one in full.
async fn messages<A: Transport>(
    console: &Console<A>,
    select: Option<Id>,
    out: &mut impl Write,
) -> Result<(), Error> {
    let page = console.inbox();
    let loaded = page.load().await;

    if let Some(id) = select {
        if !page.select(id.clone()) {
            writeln!(out, "No message {id}")?;
        }
    }
    render::inbox(out, &page.state())?;

    loaded.map_err(|e| Error::failed("Failed to load messages", e))
}
