//! Smart-home zone handlers.

use serde::Serialize;
use tabled::Tabled;

use myuplink_core::{Controller, DeviceId, Zone};

use crate::cli::{GlobalOpts, ZonesArgs};
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Tabled, Serialize)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Temp")]
    #[serde(skip)]
    temperature_cell: String,
    #[tabled(skip)]
    temperature: Option<f64>,
    #[tabled(rename = "Setpoint")]
    #[serde(skip)]
    setpoint_cell: String,
    #[tabled(skip)]
    setpoint: Option<f64>,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Command only")]
    command_only: bool,
}

impl From<&Zone> for ZoneRow {
    fn from(z: &Zone) -> Self {
        Self {
            id: z.id().get(),
            name: z.name().to_owned(),
            mode: z.mode().unwrap_or("-").to_owned(),
            temperature_cell: or_dash(z.temperature()),
            temperature: z.temperature(),
            setpoint_cell: or_dash(z.setpoint()),
            setpoint: z.setpoint(),
            unit: z.temperature_unit().to_owned(),
            command_only: z.is_command_only(),
        }
    }
}

pub async fn handle(controller: &Controller, args: ZonesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device_id = DeviceId::from(args.device.as_str());
    let zones = controller.get_zones(&device_id).await?;

    let rows: Vec<ZoneRow> = zones.iter().map(ZoneRow::from).collect();
    let out = output::render_list(&global.output, &rows, |r| r.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
