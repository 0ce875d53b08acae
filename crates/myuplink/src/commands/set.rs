//! Parameter write handler.

use myuplink_core::{Controller, DeviceId, ParameterId};

use crate::cli::{GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(controller: &Controller, args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device_id = DeviceId::from(args.device.as_str());
    let parameter_id = ParameterId::new(args.parameter);

    if args.value.trim().is_empty() {
        return Err(CliError::Validation {
            field: "value".into(),
            reason: "value cannot be empty".into(),
        });
    }

    let prompt = format!("Set parameter {parameter_id} on {device_id} to {}?", args.value);
    if !util::confirm(&prompt, global.yes)? {
        return Ok(());
    }

    let accepted = if args.force {
        controller
            .patch_parameter(&device_id, parameter_id, &args.value)
            .await?
    } else {
        // The writability check runs against a refreshed graph.
        controller.get_systems().await?;
        controller
            .update_parameter(&device_id, parameter_id, &args.value)
            .await?
    };

    if !accepted {
        return Err(CliError::Rejected {
            action: format!("the write of parameter {parameter_id}"),
        });
    }

    output::print_output(
        &format!("Parameter {parameter_id} on {device_id} set to {}", args.value),
        global.quiet,
    );
    Ok(())
}
