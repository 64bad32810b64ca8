//! [`Route`] definitions.

use strum::{Display, EnumIter, EnumString};

use super::{schema, Schema};

/// Surface of the admin console an operator may navigate to.
#[derive(
    Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Route {
    /// Login form.
    Login,

    /// Overview of the operator and the content.
    Dashboard,

    /// About document.
    About,

    /// Skills collection.
    Skills,

    /// Projects collection.
    Projects,

    /// Blog posts collection.
    Blogs,

    /// Experience entries collection.
    Experience,

    /// Testimonials collection.
    Testimonials,

    /// Services collection.
    Services,

    /// Inbound contact messages.
    Messages,
}

impl Route {
    /// Indicates whether this [`Route`] requires a [`Session`].
    ///
    /// [`Session`]: super::Session
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Returns the [`Schema`] of the content edited on this [`Route`], if
    /// any.
    #[must_use]
    pub fn schema(self) -> Option<&'static Schema> {
        Some(match self {
            Self::About => &schema::ABOUT,
            Self::Skills => &schema::SKILLS,
            Self::Projects => &schema::PROJECTS,
            Self::Blogs => &schema::BLOGS,
            Self::Experience => &schema::EXPERIENCE,
            Self::Testimonials => &schema::TESTIMONIALS,
            Self::Services => &schema::SERVICES,
            Self::Login | Self::Dashboard | Self::Messages => return None,
        })
    }
}
