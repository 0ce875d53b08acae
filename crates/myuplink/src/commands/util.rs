//! Shared helpers for command handlers.

use std::io::IsTerminal;

use myuplink_core::{Controller, Device, DeviceId, System, SystemId};

use crate::error::CliError;

/// Find a device and its system without a full refresh.
pub async fn locate_device(
    controller: &Controller,
    device_id: &DeviceId,
) -> Result<(System, Device), CliError> {
    controller
        .list_systems()
        .await?
        .into_iter()
        .find_map(|s| s.device(device_id).cloned().map(|d| (s, d)))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "device".into(),
            identifier: device_id.to_string(),
            list_command: "devices list".into(),
        })
}

/// Systems matching `filter`, or all of them. An unknown id is an error.
pub fn select_systems<'a>(
    systems: &'a [System],
    filter: Option<&str>,
) -> Result<Vec<&'a System>, CliError> {
    let Some(wanted) = filter else {
        return Ok(systems.iter().collect());
    };
    let id = SystemId::from(wanted);
    let found: Vec<_> = systems.iter().filter(|s| s.id() == &id).collect();
    if found.is_empty() {
        return Err(CliError::NotFound {
            resource_type: "system".into(),
            identifier: wanted.into(),
            list_command: "systems list".into(),
        });
    }
    Ok(found)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer failure into `CliError`.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
