//! [`Command`] for logging the operator out.

use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{storage, Transport},
    Console,
};

use super::Command;

/// [`Command`] for logging the operator out.
///
/// Removes the token and the user of the current [`Session`] together.
///
/// [`Session`]: crate::domain::Session
#[derive(Clone, Copy, Debug)]
pub struct LogOut;

impl<A: Transport> Command<LogOut> for Console<A> {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(&self, _: LogOut) -> Result<Self::Ok, Self::Err> {
        self.sessions().clear().map_err(tracerr::wrap!())?;
        log::info!("logged out");
        Ok(())
    }
}
