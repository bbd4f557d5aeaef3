//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod node;
pub mod settings;
pub mod watch;

use outlet_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::handle(session, global).await,
        Command::Config(args) => config_cmd::handle(session, args, global).await,
        Command::Node(args) => node::handle(session, args, global).await,
        Command::Watch(args) => watch::handle(session, args, global).await,
        Command::Settings(args) => settings::handle(args, global),
    }
}
