//! [`Handler`] abstraction shared by console commands and API verbs.

use std::future::Future;

/// Asynchronous operation executed with some `Args`.
///
/// Both a console command and a single verb of a remote API are
/// [`Handler`]s, so they compose the same way. The returned future is not
/// required to be [`Send`]: handlers run on a single-threaded executor and
/// may hold `!Send` state across suspension points.
pub trait Handler<Args = ()> {
    /// Result of a successful execution.
    type Ok;

    /// Error of a failed execution.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
