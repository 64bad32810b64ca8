//! Domain definitions.

pub mod message;
pub mod record;
pub mod route;
pub mod schema;
pub mod session;

pub use self::{
    message::{Inbox, Message},
    record::Record,
    route::Route,
    schema::Schema,
    session::{Session, User},
};
