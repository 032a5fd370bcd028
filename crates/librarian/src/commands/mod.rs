//! Command dispatch: bridges CLI args -> `Librarian` calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod invite;
pub mod request;
pub mod util;

use librarian_core::Librarian;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    librarian: &Librarian,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(librarian, args, global).await,
        Command::Get(args) => request::get(librarian, args, global).await,
        Command::Post(args) => request::post(librarian, args, global).await,
        Command::Invite(args) => invite::handle(librarian, args, global).await,
        // Handled before a server connection is set up.
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to server dispatch".into(),
        )),
    }
}
