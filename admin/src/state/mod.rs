//! Page state owned by controllers.

pub mod draft;
pub mod list;

pub use self::{
    draft::Draft,
    list::{Identified, List, Selection},
};
