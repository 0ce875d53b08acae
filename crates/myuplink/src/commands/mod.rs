//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod mode;
pub mod notifications;
pub mod parameters;
pub mod set;
pub mod systems;
pub mod util;
pub mod zones;

use myuplink_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Systems(args) => systems::handle(controller, args, global).await,
        Command::Devices(args) => devices::handle(controller, args, global).await,
        Command::Parameters(args) => parameters::handle(controller, args, global).await,
        Command::Set(args) => set::handle(controller, args, global).await,
        Command::Mode(args) => mode::handle(controller, args, global).await,
        Command::Notifications(args) => notifications::handle(controller, args, global).await,
        Command::Zones(args) => zones::handle(controller, args, global).await,
        // Handled before a controller is built
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not use the API".into(),
        )),
    }
}
