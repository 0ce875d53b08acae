//! System command handlers.

use serde::Serialize;
use tabled::Tabled;

use myuplink_core::{Controller, System, SystemId};

use crate::cli::{GlobalOpts, SystemsArgs, SystemsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct SystemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Access")]
    security_level: String,
    #[tabled(rename = "Alarm")]
    has_alarm: bool,
    #[tabled(rename = "Manage")]
    premium_manage: bool,
    #[tabled(rename = "Mode")]
    smart_home_mode: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

impl From<&System> for SystemRow {
    fn from(s: &System) -> Self {
        Self {
            id: s.id().to_string(),
            name: s.name().to_owned(),
            security_level: s.security_level().to_owned(),
            has_alarm: s.has_alarm(),
            premium_manage: s.premium_manage(),
            smart_home_mode: s.smart_home_mode().to_string(),
            devices: s.devices().len(),
        }
    }
}

fn detail(row: &SystemRow) -> String {
    [
        format!("ID:       {}", row.id),
        format!("Name:     {}", row.name),
        format!("Access:   {}", row.security_level),
        format!("Alarm:    {}", if row.has_alarm { "yes" } else { "no" }),
        format!("Manage:   {}", if row.premium_manage { "yes" } else { "no" }),
        format!("Mode:     {}", row.smart_home_mode),
        format!("Devices:  {}", row.devices),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SystemsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let systems = controller.get_systems().await?;

    let out = match args.command.unwrap_or(SystemsCommand::List) {
        SystemsCommand::List => {
            let rows: Vec<SystemRow> = systems.iter().map(SystemRow::from).collect();
            output::render_list(&global.output, &rows, |r| r.id.clone())?
        }
        SystemsCommand::Get { system } => {
            let found = controller.find_system(&SystemId::from(system.as_str()))?;
            let row = SystemRow::from(&found);
            output::render_single(&global.output, &row, detail, |r| r.id.clone())?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
