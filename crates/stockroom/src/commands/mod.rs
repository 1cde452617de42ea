//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod logs;
pub mod products;
pub mod reports;
pub mod suppliers;
pub mod util;

use stockroom_core::Stockroom;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    stockroom: &Stockroom,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => auth::whoami(stockroom, global),
        Command::Dashboard => dashboard::handle(stockroom, global).await,
        Command::Products(args) => products::handle(stockroom, args, global).await,
        Command::Suppliers(args) => suppliers::handle(stockroom, args, global).await,
        Command::Logs(args) => logs::handle(stockroom, args, global).await,
        Command::Reports(args) => reports::handle(stockroom, args, global).await,
        // Handled before a session is opened
        Command::Register(_) | Command::SeedDemo | Command::Config(_) | Command::Completions(_) => {
            unreachable!("dispatched without a session")
        }
    }
}
