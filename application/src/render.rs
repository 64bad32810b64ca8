//! Plain text rendering of console pages.

use std::io::{self, Write};

use admin::{
    controller::{collection, singleton, viewer},
    domain::{schema::Input, Message, Record, Schema, Session},
};
use itertools::Itertools as _;
use serde_json::Value;

/// Renders the provided [`Session`] operator.
///
/// # Errors
///
/// If the output cannot be written.
pub fn session(out: &mut impl Write, session: Option<&Session>) -> io::Result<()> {
    let Some(session) = session else {
        return writeln!(out, "Not logged in");
    };
    match &session.user {
        Some(user) if !user.email.is_empty() => {
            writeln!(out, "Logged in as {} <{}>", user.name, user.email)
        }
        Some(user) if !user.name.is_empty() => {
            writeln!(out, "Logged in as {}", user.name)
        }
        Some(_) | None => writeln!(out, "Logged in"),
    }
}

/// Renders a JSON field value for humans.
#[must_use]
pub fn value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "yes".to_owned(),
        Value::Bool(false) => "no".to_owned(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(self::value).join(", "),
        Value::Number(n) => n.to_string(),
        Value::Object(_) => value.to_string(),
    }
}

/// Renders a single [`Record`] of the provided [`Schema`].
///
/// # Errors
///
/// If the output cannot be written.
pub fn record(
    out: &mut impl Write,
    schema: &Schema,
    record: &Record,
) -> io::Result<()> {
    let title = schema
        .fields
        .first()
        .and_then(|f| record.get(f.name))
        .map(value)
        .unwrap_or_default();
    writeln!(out, "[{}] {title}", record.id)?;
    for field in schema.fields.iter().skip(1) {
        let Some(v) = record.get(field.name).map(value) else {
            continue;
        };
        if !v.is_empty() {
            writeln!(out, "    {}: {v}", field.label)?;
        }
    }
    Ok(())
}

/// Renders a [`collection::State`] page.
///
/// # Errors
///
/// If the output cannot be written.
pub fn collection(
    out: &mut impl Write,
    schema: &Schema,
    state: &collection::State,
) -> io::Result<()> {
    if let Some(banner) = &state.banner {
        writeln!(out, "! {banner}")?;
    }
    if let Some(alert) = &state.alert {
        writeln!(out, "! {alert}")?;
    }
    if state.records.is_empty() {
        return writeln!(out, "No {} yet", schema.plural);
    }
    writeln!(out, "{} ({})", schema.title, state.records.len())?;
    for r in &state.records {
        record(out, schema, r)?;
    }
    Ok(())
}

/// Renders a [`singleton::State`] page.
///
/// # Errors
///
/// If the output cannot be written.
pub fn singleton(
    out: &mut impl Write,
    state: &singleton::State,
) -> io::Result<()> {
    if let Some(banner) = &state.banner {
        writeln!(out, "! {banner}")?;
    }
    if let Some(notice) = &state.notice {
        writeln!(out, "{notice}")?;
    }
    match &state.persistence {
        singleton::Persistence::Draft => writeln!(out, "(not saved yet)")?,
        singleton::Persistence::Persisted(id) => writeln!(out, "[{id}]")?,
    }
    for (field, input) in state.draft.fields() {
        match input {
            Input::Flag(flag) => {
                writeln!(out, "{}: {}", field.label, if *flag { "yes" } else { "no" })?;
            }
            Input::Text(text) if text.contains('\n') => {
                writeln!(out, "{}:", field.label)?;
                for line in text.lines() {
                    writeln!(out, "    {line}")?;
                }
            }
            Input::Text(text) => writeln!(out, "{}: {text}", field.label)?,
        }
    }
    Ok(())
}

/// Renders a contact [`Message`] in full.
///
/// # Errors
///
/// If the output cannot be written.
pub fn message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    writeln!(out, "From: {} <{}>", message.name, message.email)?;
    writeln!(out, "Subject: {}", message.subject_or_placeholder())?;
    writeln!(out, "Date: {}", message.created_at.to_human())?;
    writeln!(out)?;
    writeln!(out, "{}", message.message)
}

/// Renders a [`viewer::State`] page of contact [`Message`]s.
///
/// # Errors
///
/// If the output cannot be written.
pub fn inbox(
    out: &mut impl Write,
    state: &viewer::State<Message>,
) -> io::Result<()> {
    if let Some(banner) = &state.banner {
        writeln!(out, "! {banner}")?;
    }
    if state.items.is_empty() {
        writeln!(out, "No messages yet")?;
    }
    for m in &state.items {
        let marker = if state.selection.id() == Some(&m.id) { '>' } else { ' ' };
        writeln!(
            out,
            "{marker} [{}] {} - {} ({})",
            m.id,
            m.name,
            m.subject_or_placeholder(),
            m.created_at.to_human(),
        )?;
    }
    writeln!(out)?;
    match state.selected() {
        Some(m) => message(out, m),
        None => writeln!(out, "Nothing selected"),
    }
}

/// Loaded count of the records of a content type.
#[derive(Clone, Copy, Debug)]
pub struct Count {
    /// Title of the content type.
    pub title: &'static str,

    /// Number of records, if they were loaded.
    pub total: Option<usize>,
}

/// Renders the dashboard page.
///
/// # Errors
///
/// If the output cannot be written.
pub fn dashboard(
    out: &mut impl Write,
    session: Option<&Session>,
    counts: &[Count],
) -> io::Result<()> {
    self::session(out, session)?;
    writeln!(out)?;
    let width = counts.iter().map(|c| c.title.len()).max().unwrap_or_default();
    for Count { title, total } in counts {
        match total {
            Some(n) => writeln!(out, "{title:width$}  {n}")?,
            None => writeln!(out, "{title:width$}  unavailable")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod spec {
    use std::io;

    use admin::domain::{schema::SKILLS, Record, Session, User};
    use serde_json::json;

    use super::{dashboard, record, session, value, Count};

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_values_for_humans() {
        assert_eq!(value(&json!(["a", "b"])), "a, b");
        assert_eq!(value(&json!(true)), "yes");
        assert_eq!(value(&json!(null)), "");
        assert_eq!(value(&json!(5)), "5");
    }

    #[test]
    fn renders_record_fields_by_label() {
        let r: Record = serde_json::from_value(json!({
            "_id": "a1",
            "name": "Rust",
            "level": "Advanced",
            "category": "",
        }))
        .unwrap();

        assert_eq!(
            rendered(|out| record(out, &SKILLS, &r)),
            "[a1] Rust\n    Level: Advanced\n",
        );
    }

    #[test]
    fn renders_operator() {
        let s = Session {
            token: "abc".into(),
            user: Some(User {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                ..User::default()
            }),
        };

        assert_eq!(
            rendered(|out| session(out, Some(&s))),
            "Logged in as Ada <ada@example.com>\n",
        );
        assert_eq!(rendered(|out| session(out, None)), "Not logged in\n");
    }

    #[test]
    fn renders_unavailable_counts() {
        let counts = [
            Count {
                title: "Skills",
                total: Some(3),
            },
            Count {
                title: "Testimonials",
                total: None,
            },
        ];

        assert_eq!(
            rendered(|out| dashboard(out, None, &counts)),
            "Not logged in\n\nSkills        3\nTestimonials  unavailable\n",
        );
    }
}
