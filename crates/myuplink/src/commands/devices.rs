//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use myuplink_core::{Controller, Device, DeviceId, FirmwareInfo};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "System")]
    system_id: String,
    #[tabled(rename = "Serial")]
    serial_number: String,
    #[tabled(rename = "State")]
    connection_state: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id().to_string(),
            name: d.name(),
            system_id: d.system_id().to_string(),
            serial_number: d.serial_number().to_owned(),
            connection_state: d.connection_state().to_owned(),
            firmware: or_dash(d.current_firmware_version()),
        }
    }
}

#[derive(Serialize)]
struct DeviceDetail {
    id: String,
    name: String,
    manufacturer: Option<String>,
    model: String,
    serial_number: String,
    connection_state: String,
    current_firmware: Option<String>,
    pending_firmware: Option<String>,
    desired_firmware: Option<String>,
    update_available: bool,
}

impl DeviceDetail {
    fn new(device: &Device, firmware: &FirmwareInfo) -> Self {
        Self {
            id: device.id().to_string(),
            name: device.name(),
            manufacturer: device.manufacturer(),
            model: device.model(),
            serial_number: device.serial_number().to_owned(),
            connection_state: device.connection_state().to_owned(),
            current_firmware: firmware.current_version().map(str::to_owned),
            pending_firmware: firmware.pending_version().map(str::to_owned),
            desired_firmware: firmware.desired_version().map(str::to_owned),
            update_available: firmware.update_available(),
        }
    }
}

fn detail(d: &DeviceDetail) -> String {
    [
        format!("ID:           {}", d.id),
        format!("Name:         {}", d.name),
        format!("Manufacturer: {}", d.manufacturer.as_deref().unwrap_or("-")),
        format!("Model:        {}", d.model),
        format!("Serial:       {}", d.serial_number),
        format!("State:        {}", d.connection_state),
        format!("Firmware:     {}", d.current_firmware.as_deref().unwrap_or("-")),
        format!("Pending:      {}", d.pending_firmware.as_deref().unwrap_or("-")),
        format!("Desired:      {}", d.desired_firmware.as_deref().unwrap_or("-")),
        format!("Update:       {}", if d.update_available { "available" } else { "none" }),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command.unwrap_or(DevicesCommand::List { system: None }) {
        DevicesCommand::List { system } => {
            let systems = controller.list_systems().await?;
            let rows: Vec<DeviceRow> = util::select_systems(&systems, system.as_deref())?
                .into_iter()
                .flat_map(|s| s.devices().iter().map(DeviceRow::from))
                .collect();
            output::render_list(&global.output, &rows, |r| r.id.clone())?
        }
        DevicesCommand::Get { device } => {
            let device_id = DeviceId::from(device.as_str());
            let (_, device) = util::locate_device(controller, &device_id).await?;
            let firmware = controller.get_firmware_info(&device_id).await?;
            let view = DeviceDetail::new(&device, &firmware);
            output::render_single(&global.output, &view, detail, |d| d.id.clone())?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
