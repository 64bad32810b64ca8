//! [`Draft`] form state.

use derive_more::{Display, Error};
use serde_json::{Map, Value};

use crate::domain::schema::{self, Encoding, Field, Input, Schema};

/// Unsaved field values of a create or update form.
///
/// Always holds one [`Input`] per [`Field`] of its [`Schema`]. Owns its
/// values: no fetched record is ever shared with it.
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Schema`] of this [`Draft`].
    schema: &'static Schema,

    /// Current [`Input`]s, in [`Schema::fields`] order.
    inputs: Vec<Input>,
}

impl Draft {
    /// Creates a new [`Draft`] with the initial values of the provided
    /// [`Schema`].
    #[must_use]
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            inputs: schema.fields.iter().map(Field::initial_input).collect(),
        }
    }

    /// Creates a new [`Draft`] editing the provided wire fields.
    ///
    /// Fields absent from `fields` start with their initial values.
    #[must_use]
    pub fn from_fields(schema: &'static Schema, fields: &Map<String, Value>) -> Self {
        Self {
            schema,
            inputs: schema
                .fields
                .iter()
                .map(|f| match fields.get(f.name) {
                    Some(v) => f.encoding.decode(v),
                    None => f.initial_input(),
                })
                .collect(),
        }
    }

    /// Returns the current [`Input`] of the provided field, if it exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Input> {
        self.position(name).map(|i| &self.inputs[i])
    }

    /// Sets the [`Input`] of the provided field.
    ///
    /// # Errors
    ///
    /// If the field doesn't exist or doesn't accept such [`Input`].
    pub fn set(
        &mut self,
        name: &str,
        input: impl Into<Input>,
    ) -> Result<(), FieldError> {
        let pos = self
            .position(name)
            .ok_or_else(|| FieldError::Unknown(name.to_owned()))?;
        let field = &self.schema.fields[pos];
        let input = input.into();

        match (&field.encoding, &input) {
            (Encoding::Flag, Input::Flag(_))
            | (
                Encoding::Text
                | Encoding::Number
                | Encoding::Delimited
                | Encoding::Lines
                | Encoding::Date { .. },
                Input::Text(_),
            ) => {}
            (Encoding::Choice(options), Input::Text(value)) => {
                if !options.iter().any(|o| *o == value.as_str()) {
                    return Err(FieldError::InvalidChoice {
                        field: field.name,
                        value: value.clone(),
                    });
                }
            }
            (Encoding::Flag, Input::Text(_))
            | (
                Encoding::Text
                | Encoding::Choice(_)
                | Encoding::Number
                | Encoding::Delimited
                | Encoding::Lines
                | Encoding::Date { .. },
                Input::Flag(_),
            ) => return Err(FieldError::Mismatch(field.name)),
        }

        self.inputs[pos] = input;
        Ok(())
    }

    /// Sets the provided field from its textual representation, as typed on
    /// a command line.
    ///
    /// # Errors
    ///
    /// If the field doesn't exist or `raw` is not a valid value of it.
    pub fn parse(&mut self, name: &str, raw: &str) -> Result<(), FieldError> {
        let schema = self.schema;
        let field = schema
            .field(name)
            .ok_or_else(|| FieldError::Unknown(name.to_owned()))?;
        if matches!(field.encoding, Encoding::Flag) {
            let flag = schema::parse_flag(raw)
                .ok_or(FieldError::InvalidFlag(field.name))?;
            self.set(name, flag)
        } else {
            self.set(name, raw)
        }
    }

    /// Resets every field of this [`Draft`] to its initial value.
    pub fn reset(&mut self) {
        *self = Self::new(self.schema);
    }

    /// Returns the required [`Field`]s currently left blank.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static Field> {
        self.fields()
            .filter(|(f, input)| f.required && input.is_blank())
            .map(|(f, _)| f)
            .collect()
    }

    /// Iterates over every [`Field`] of this [`Draft`] along with its current
    /// [`Input`].
    pub fn fields(&self) -> impl Iterator<Item = (&'static Field, &Input)> {
        self.schema.fields.iter().zip(&self.inputs)
    }

    /// Serializes this [`Draft`] into a wire request body.
    #[must_use]
    pub fn serialize(&self) -> Map<String, Value> {
        self.fields()
            .map(|(f, input)| {
                let cleared = match f.encoding {
                    Encoding::Date {
                        cleared_by: Some(flag),
                    } => self.get(flag) == Some(&Input::Flag(true)),
                    Encoding::Text
                    | Encoding::Choice(_)
                    | Encoding::Flag
                    | Encoding::Number
                    | Encoding::Delimited
                    | Encoding::Lines
                    | Encoding::Date { cleared_by: None } => false,
                };
                let value = if cleared {
                    Value::Null
                } else {
                    f.encoding.encode(input)
                };
                (f.name.to_owned(), value)
            })
            .collect()
    }

    /// Returns the position of the provided field in [`Schema::fields`].
    fn position(&self, name: &str) -> Option<usize> {
        self.schema.fields.iter().position(|f| f.name == name)
    }
}

/// Error of editing a [`Draft`] field.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum FieldError {
    /// No such field exists.
    #[display("unknown field `{_0}`")]
    Unknown(#[error(not(source))] String),

    /// Field expects a different kind of [`Input`].
    #[display("field `{_0}` expects a different kind of value")]
    Mismatch(#[error(not(source))] &'static str),

    /// Field is a flag, but the value is not a boolean.
    #[display("field `{_0}` expects `true` or `false`")]
    InvalidFlag(#[error(not(source))] &'static str),

    /// Value is not one of the field options.
    #[display("`{value}` is not a valid `{field}`")]
    InvalidChoice {
        /// Name of the field.
        field: &'static str,

        /// Rejected value.
        value: String,
    },
}

#[cfg(test)]
mod spec {
    use serde_json::{json, Value};

    use crate::domain::schema::{Input, ABOUT, EXPERIENCE, PROJECTS, SKILLS};

    use super::{Draft, FieldError};

    #[test]
    fn starts_with_schema_defaults() {
        let draft = Draft::new(&SKILLS);

        assert_eq!(draft.get("name"), Some(&Input::from("")));
        assert_eq!(draft.get("level"), Some(&Input::from("Intermediate")));
        assert_eq!(draft.get("unknown"), None);
    }

    #[test]
    fn serializes_list_fields() {
        let mut draft = Draft::new(&PROJECTS);
        draft.set("title", "Folio").unwrap();
        draft.set("techStack", "a, b ,, c").unwrap();
        draft.set("featured", true).unwrap();

        let body = Value::Object(draft.serialize());
        assert_eq!(body["title"], "Folio");
        assert_eq!(body["techStack"], json!(["a", "b", "c"]));
        assert_eq!(body["featured"], json!(true));
        assert_eq!(body["githubUrl"], "");
    }

    #[test]
    fn current_role_has_no_end_date() {
        let mut draft = Draft::new(&EXPERIENCE);
        draft.set("startDate", "2024-01-15").unwrap();
        draft.set("endDate", "2025-02-01").unwrap();
        draft.set("current", true).unwrap();

        let body = Value::Object(draft.serialize());
        assert_eq!(body["startDate"], "2024-01-15T00:00:00Z");
        assert_eq!(body["endDate"], Value::Null);

        draft.set("current", false).unwrap();
        let body = Value::Object(draft.serialize());
        assert_eq!(body["endDate"], "2025-02-01T00:00:00Z");
    }

    #[test]
    fn rejects_invalid_edits() {
        let mut draft = Draft::new(&SKILLS);

        assert_eq!(
            draft.set("nope", "x"),
            Err(FieldError::Unknown("nope".into())),
        );
        assert_eq!(draft.set("name", true), Err(FieldError::Mismatch("name")));
        assert_eq!(
            draft.set("level", "Guru"),
            Err(FieldError::InvalidChoice {
                field: "level",
                value: "Guru".into(),
            }),
        );
        assert_eq!(draft.get("level"), Some(&Input::from("Intermediate")));
    }

    #[test]
    fn parses_command_line_values() {
        let mut draft = Draft::new(&PROJECTS);

        draft.parse("featured", "yes").unwrap();
        assert_eq!(draft.get("featured"), Some(&Input::Flag(true)));
        assert_eq!(
            draft.parse("featured", "maybe"),
            Err(FieldError::InvalidFlag("featured")),
        );
        draft.parse("title", "true").unwrap();
        assert_eq!(draft.get("title"), Some(&Input::from("true")));
    }

    #[test]
    fn reports_missing_required_fields() {
        let mut draft = Draft::new(&SKILLS);
        let names = |d: &Draft| d.missing().iter().map(|f| f.name).collect::<Vec<_>>();

        assert_eq!(names(&draft), ["name"]);
        draft.set("name", "  ").unwrap();
        assert_eq!(names(&draft), ["name"]);
        draft.set("name", "Rust").unwrap();
        assert!(names(&draft).is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut draft = Draft::new(&SKILLS);
        draft.set("name", "Rust").unwrap();
        draft.set("level", "Advanced").unwrap();

        draft.reset();

        assert_eq!(draft.get("name"), Some(&Input::from("")));
        assert_eq!(draft.get("level"), Some(&Input::from("Intermediate")));
    }

    #[test]
    fn edits_loaded_document() {
        let fields = json!({
            "heading": "Hi",
            "highlightPoints": ["Rust", "Go"],
        });
        let draft = Draft::from_fields(&ABOUT, fields.as_object().unwrap());

        assert_eq!(draft.get("heading"), Some(&Input::from("Hi")));
        assert_eq!(draft.get("highlightPoints"), Some(&Input::from("Rust\nGo")));
        assert_eq!(draft.get("subheading"), Some(&Input::from("")));
        assert_eq!(
            Value::Object(draft.serialize())["highlightPoints"],
            json!(["Rust", "Go"]),
        );
    }
}
