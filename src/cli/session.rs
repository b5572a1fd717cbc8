//! Interactive session command

use crate::auth::Session;
use crate::config::{BookkeeperPaths, Settings};
use crate::error::BookkeeperResult;

use super::prompt::ConsolePrompt;

/// Run an interactive session on the console
///
/// Leaving a flow (end of input, too many attempts) ends the session
/// normally; the store is closed on every path.
pub fn handle_session(paths: &BookkeeperPaths, settings: Settings) -> BookkeeperResult<()> {
    let mut prompt = ConsolePrompt::new();

    let mut session = match Session::start(paths, settings, &mut prompt) {
        Ok(session) => session,
        Err(e) if e.is_aborted() => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let outcome = session.run(&mut prompt);
    session.close()?;

    match outcome {
        Ok(_) => Ok(()),
        Err(e) if e.is_aborted() => {
            println!("{}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
