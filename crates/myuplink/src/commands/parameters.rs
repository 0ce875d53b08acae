//! Parameter (data point) command handlers.

use serde::Serialize;
use tabled::Tabled;

use myuplink_core::{Controller, DeviceId, Parameter, Platform};

use crate::cli::{GlobalOpts, ParametersArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct ParameterRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    #[serde(skip)]
    shown: String,
    #[tabled(skip)]
    value: Option<f64>,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Type")]
    platform: Platform,
    #[tabled(rename = "Writable")]
    writable: bool,
    #[tabled(skip)]
    category: String,
    #[tabled(skip)]
    text: Option<String>,
    #[tabled(skip)]
    min: Option<f64>,
    #[tabled(skip)]
    max: Option<f64>,
    #[tabled(skip)]
    step: Option<f64>,
    #[tabled(skip)]
    timestamp: Option<String>,
}

impl ParameterRow {
    fn new(p: &Parameter, device_name: &str) -> Self {
        let value = p.scaled_value();
        let text = p.enum_text().map(str::to_owned);
        let shown = match (&text, value) {
            (Some(text), _) => text.clone(),
            (None, Some(v)) => v.to_string(),
            (None, None) if !p.string_value().is_empty() => p.string_value().to_owned(),
            (None, None) => "-".into(),
        };
        Self {
            id: p.id().get(),
            name: p.display_name(device_name),
            shown,
            value,
            unit: p.unit(),
            platform: p.platform(),
            writable: p.is_writable(),
            category: p.category().to_owned(),
            text,
            min: p.scaled_min(),
            max: p.scaled_max(),
            step: p.scaled_step(),
            timestamp: p.timestamp().map(str::to_owned),
        }
    }
}

fn matches(p: &Parameter, args: &ParametersArgs) -> bool {
    if args.writable && !p.is_writable() {
        return false;
    }
    if let Some(platform) = args.platform {
        if p.platform() != Platform::from(platform) {
            return false;
        }
    }
    if let Some(needle) = &args.filter {
        let needle = needle.to_lowercase();
        if !p.name().to_lowercase().contains(&needle)
            && !p.category().to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ParametersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device_id = DeviceId::from(args.device.as_str());
    let (system, device) = util::locate_device(controller, &device_id).await?;

    let premium = controller.get_premium_manage(system.id()).await?;
    let fetch = controller.get_parameters(&device_id, premium).await?;
    if fetch.duplicates > 0 {
        tracing::info!("skipped {} duplicate parameter row(s)", fetch.duplicates);
    }

    let device_name = device.name();
    let rows: Vec<ParameterRow> = fetch
        .parameters
        .iter()
        .filter(|p| matches(p, &args))
        .map(|p| ParameterRow::new(p, &device_name))
        .collect();

    let out = output::render_list(&global.output, &rows, |r| format!("{}\t{}", r.id, r.shown))?;

    output::print_output(&out, global.quiet);
    Ok(())
}
