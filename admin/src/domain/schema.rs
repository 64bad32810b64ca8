//! [`Schema`] definitions of the managed content types.

use common::DateTime;
use derive_more::From;
use serde_json::{Number, Value};

/// Declarative description of a content type.
#[derive(Debug, Eq, PartialEq)]
pub struct Schema {
    /// Title of the content type, as shown in the console.
    pub title: &'static str,

    /// Human name of a single record.
    pub singular: &'static str,

    /// Human name of several records.
    pub plural: &'static str,

    /// API endpoint the records are served at.
    pub endpoint: &'static str,

    /// [`Field`]s of a record, in form order.
    pub fields: &'static [Field],

    /// Confirmation prompt asked before deleting a record, if it differs
    /// from `Delete this <singular>?`.
    pub removal_prompt: Option<&'static str>,
}

impl Schema {
    /// Returns the [`Field`] with the provided `name`, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the confirmation prompt asked before deleting a record.
    #[must_use]
    pub fn removal_prompt(&self) -> String {
        self.removal_prompt.map_or_else(
            || format!("Delete this {}?", self.singular),
            str::to_owned,
        )
    }
}

/// Single editable field of a [`Schema`].
#[derive(Debug, Eq, PartialEq)]
pub struct Field {
    /// Wire name of this [`Field`].
    pub name: &'static str,

    /// Human label of this [`Field`].
    pub label: &'static str,

    /// [`Encoding`] of this [`Field`] on the wire.
    pub encoding: Encoding,

    /// Indicates whether a form must not be submitted with this [`Field`]
    /// left blank.
    pub required: bool,

    /// Initial edit value of this [`Field`].
    ///
    /// Ignored for [`Encoding::Flag`]s, which always start unset.
    pub initial: &'static str,
}

impl Field {
    /// Creates a new optional [`Encoding::Text`] [`Field`].
    #[must_use]
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            encoding: Encoding::Text,
            required: false,
            initial: "",
        }
    }

    /// Sets the [`Encoding`] of this [`Field`].
    #[must_use]
    pub const fn encoded(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Marks this [`Field`] as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the initial edit value of this [`Field`].
    #[must_use]
    pub const fn initial(mut self, initial: &'static str) -> Self {
        self.initial = initial;
        self
    }

    /// Returns the [`Input`] a fresh form starts this [`Field`] with.
    #[must_use]
    pub fn initial_input(&self) -> Input {
        match self.encoding {
            Encoding::Flag => Input::Flag(false),
            Encoding::Text
            | Encoding::Choice(_)
            | Encoding::Number
            | Encoding::Delimited
            | Encoding::Lines
            | Encoding::Date { .. } => Input::Text(self.initial.to_owned()),
        }
    }
}

/// Edit value of a [`Field`], as held by a form.
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub enum Input {
    /// Free text.
    #[from(&str, String)]
    Text(String),

    /// Checkbox state.
    #[from]
    Flag(bool),
}

impl Input {
    /// Returns the text of this [`Input`], if it's an [`Input::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    /// Indicates whether this [`Input`] holds nothing meaningful.
    ///
    /// An unset [`Input::Flag`] is never blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Flag(_) => false,
        }
    }
}

/// Wire encoding of a [`Field`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    /// Plain string, sent as typed.
    Text,

    /// String out of a closed set of options.
    Choice(&'static [&'static str]),

    /// Boolean.
    Flag,

    /// Number, typed as text.
    Number,

    /// Sequence of strings, typed as a single comma-separated string.
    Delimited,

    /// Sequence of strings, typed one per line.
    Lines,

    /// Point in time, typed as a date.
    Date {
        /// Name of an [`Encoding::Flag`] [`Field`] which, when set, sends
        /// this [`Field`] as `null` regardless of its [`Input`].
        cleared_by: Option<&'static str>,
    },
}

impl Encoding {
    /// Separator of [`Encoding::Delimited`] segments.
    pub const DELIMITER: char = ',';

    /// Encodes the provided [`Input`] into its wire JSON.
    #[must_use]
    pub fn encode(&self, input: &Input) -> Value {
        let text = match input {
            Input::Flag(flag) => return Value::Bool(*flag),
            Input::Text(text) => text,
        };
        match self {
            Self::Text | Self::Choice(_) => Value::String(text.clone()),
            Self::Flag => Value::Bool(parse_flag(text).unwrap_or(false)),
            Self::Number => encode_number(text),
            Self::Delimited => split(text, Self::DELIMITER).into(),
            Self::Lines => split(text, '\n').into(),
            Self::Date { .. } => DateTime::from_input(text)
                .map_or(Value::Null, |at| Value::String(at.to_rfc3339())),
        }
    }

    /// Decodes the provided wire JSON back into an edit [`Input`].
    ///
    /// Sequences are joined back with their separator, so that an unchanged
    /// [`Input`] encodes into the same sequence again.
    #[must_use]
    pub fn decode(&self, value: &Value) -> Input {
        match (self, value) {
            (Self::Flag, Value::Bool(flag)) => Input::Flag(*flag),
            (Self::Flag, _) => Input::Flag(false),
            (Self::Delimited, Value::Array(items)) => {
                Input::Text(join(items, ", "))
            }
            (Self::Lines, Value::Array(items)) => Input::Text(join(items, "\n")),
            (Self::Date { .. }, Value::String(at)) => Input::Text(
                DateTime::from_rfc3339(at)
                    .map_or_else(|_| at.clone(), |at| at.to_calendar_date()),
            ),
            (_, Value::Null) => Input::Text(String::new()),
            (_, Value::String(s)) => Input::Text(s.clone()),
            (_, other) => Input::Text(other.to_string()),
        }
    }
}

/// Splits the provided `input` by the `separator`, trimming each segment and
/// dropping the empty ones.
#[must_use]
pub fn split(input: &str, separator: char) -> Vec<String> {
    input
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parses a textual boolean, as typed on a command line.
#[must_use]
pub fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Encodes a number typed as text.
///
/// Blank text is sent as `null`, non-numeric text is sent as typed.
fn encode_number(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return int.into();
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(text.to_owned()), Value::Number)
}

/// Joins the string items of a JSON sequence with the provided `separator`.
fn join(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Options of a skill level.
pub const SKILL_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];

/// About document.
pub static ABOUT: Schema = Schema {
    title: "About",
    singular: "About content",
    plural: "About content",
    endpoint: "/about",
    fields: &[
        Field::new("heading", "Heading").required(),
        Field::new("subheading", "Subheading"),
        Field::new("description", "Description").required(),
        Field::new("avatarUrl", "Avatar URL"),
        Field::new("highlightPoints", "Highlight points")
            .encoded(Encoding::Lines),
    ],
    removal_prompt: None,
};

/// Skills collection.
pub static SKILLS: Schema = Schema {
    title: "Skills",
    singular: "skill",
    plural: "skills",
    endpoint: "/skills",
    fields: &[
        Field::new("name", "Skill name").required(),
        Field::new("level", "Level")
            .encoded(Encoding::Choice(SKILL_LEVELS))
            .initial("Intermediate"),
        Field::new("category", "Category"),
        Field::new("icon", "Icon"),
    ],
    removal_prompt: None,
};

/// Projects collection.
pub static PROJECTS: Schema = Schema {
    title: "Projects",
    singular: "project",
    plural: "projects",
    endpoint: "/projects",
    fields: &[
        Field::new("title", "Title").required(),
        Field::new("slug", "Slug").required(),
        Field::new("description", "Description").required(),
        Field::new("techStack", "Tech stack").encoded(Encoding::Delimited),
        Field::new("githubUrl", "GitHub URL"),
        Field::new("liveUrl", "Live URL"),
        Field::new("thumbnailUrl", "Thumbnail URL"),
        Field::new("featured", "Featured").encoded(Encoding::Flag),
    ],
    removal_prompt: None,
};

/// Blog posts collection.
pub static BLOGS: Schema = Schema {
    title: "Blogs",
    singular: "blog",
    plural: "blogs",
    endpoint: "/blogs",
    fields: &[
        Field::new("title", "Title").required(),
        Field::new("slug", "Slug").required(),
        Field::new("excerpt", "Excerpt"),
        Field::new("content", "Content").required(),
        Field::new("coverImageUrl", "Cover image URL"),
        Field::new("tags", "Tags").encoded(Encoding::Delimited),
        Field::new("published", "Published").encoded(Encoding::Flag),
    ],
    removal_prompt: None,
};

/// Experience entries collection.
pub static EXPERIENCE: Schema = Schema {
    title: "Experience",
    singular: "experience",
    plural: "experiences",
    endpoint: "/experience",
    fields: &[
        Field::new("role", "Role").required(),
        Field::new("company", "Company").required(),
        Field::new("location", "Location"),
        Field::new("startDate", "Start date")
            .encoded(Encoding::Date { cleared_by: None })
            .required(),
        Field::new("endDate", "End date").encoded(Encoding::Date {
            cleared_by: Some("current"),
        }),
        Field::new("current", "Currently working here")
            .encoded(Encoding::Flag),
        Field::new("description", "Description"),
        Field::new("highlights", "Highlights").encoded(Encoding::Lines),
    ],
    removal_prompt: None,
};

/// Testimonials collection.
pub static TESTIMONIALS: Schema = Schema {
    title: "Testimonials",
    singular: "testimonial",
    plural: "testimonials",
    endpoint: "/testimonials",
    fields: &[
        Field::new("name", "Name").required(),
        Field::new("role", "Role"),
        Field::new("company", "Company"),
        Field::new("avatarUrl", "Avatar URL"),
        Field::new("quote", "Quote").required(),
        Field::new("rating", "Rating")
            .encoded(Encoding::Number)
            .initial("5"),
    ],
    removal_prompt: Some("Delete testimonial?"),
};

/// Services collection.
pub static SERVICES: Schema = Schema {
    title: "Services",
    singular: "service",
    plural: "services",
    endpoint: "/services",
    fields: &[
        Field::new("title", "Title").required(),
        Field::new("slug", "Slug"),
        Field::new("description", "Description").required(),
        Field::new("icon", "Icon"),
        Field::new("featured", "Featured").encoded(Encoding::Flag),
    ],
    removal_prompt: None,
};

/// All the collection [`Schema`]s, in navigation order.
pub static COLLECTIONS: [&Schema; 6] = [
    &SKILLS,
    &PROJECTS,
    &BLOGS,
    &EXPERIENCE,
    &TESTIMONIALS,
    &SERVICES,
];
