//! [`Terminal`] confirmations.

use std::io::{self, BufRead as _, Write as _};

use admin::confirm::{self, Confirm, Decision, Pending};
use tracing as log;

/// [`Confirm`] asking the operator on the terminal.
///
/// Anything but an explicit "yes" declines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Terminal;

impl Confirm for Terminal {
    fn confirm(&self, prompt: String) -> Pending {
        let (request, pending) = confirm::request(prompt);
        match ask(request.prompt()) {
            Ok(decision) => request.resolve(decision),
            // Dropped request declines.
            Err(e) => log::warn!("cannot read confirmation: {e}"),
        }
        pending
    }
}

/// Prints the `prompt` and reads the answer line.
fn ask(prompt: &str) -> io::Result<Decision> {
    let mut out = io::stdout().lock();
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;

    let mut line = String::new();
    _ = io::stdin().lock().read_line(&mut line)?;
    Ok(answer(&line))
}

/// Interprets the typed answer line.
#[must_use]
pub fn answer(line: &str) -> Decision {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes").into()
}
