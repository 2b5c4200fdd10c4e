//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod auth;
pub mod blocking;
pub mod config_cmd;
pub mod groups;
pub mod stats;

use pihole_api::PiholeClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &PiholeClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Status => auth::status(client, global).await,
        Command::Logout => auth::logout(client, global).await,
        Command::Summary => stats::summary(client, global).await,
        Command::Padd(args) => stats::padd(client, &args, global).await,
        Command::Blocking(args) => blocking::handle(client, args, global).await,
        Command::Groups(args) => groups::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    };

    result.map_err(|e| CliError::from_api(e, client.base_url()))
}
