//! Smart-home mode handlers.

use serde::Serialize;

use myuplink_core::{Controller, SmartHomeMode, SystemId};

use crate::cli::{GlobalOpts, ModeArgs, ModeCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ModeView {
    system_id: String,
    smart_home_mode: SmartHomeMode,
}

pub async fn handle(controller: &Controller, args: ModeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ModeCommand::Get { system } => {
            let system_id = SystemId::from(system.as_str());
            let mode = controller.get_smart_home_mode(&system_id).await?;
            let view = ModeView {
                system_id: system_id.to_string(),
                smart_home_mode: mode,
            };
            let out = output::render_single(
                &global.output,
                &view,
                |v| format!("{}: {}", v.system_id, v.smart_home_mode),
                |v| v.smart_home_mode.to_string(),
            )?;
            output::print_output(&out, global.quiet);
        }
        ModeCommand::Set { system, mode } => {
            let system_id = SystemId::from(system.as_str());
            if !controller.put_smart_home_mode(&system_id, mode).await? {
                return Err(CliError::Rejected {
                    action: format!("smart-home mode '{mode}'"),
                });
            }
            output::print_output(&format!("{system_id}: mode set to {mode}"), global.quiet);
        }
    }
    Ok(())
}
