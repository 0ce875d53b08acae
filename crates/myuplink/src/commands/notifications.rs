//! Active notification (alarm) handlers.

use serde::Serialize;
use tabled::Tabled;

use myuplink_core::{Controller, Notification};

use crate::cli::{GlobalOpts, NotificationsArgs};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

#[derive(Tabled, Serialize)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Alarm")]
    #[serde(skip)]
    alarm: String,
    #[tabled(skip)]
    alarm_number: Option<i64>,
    #[tabled(rename = "Device")]
    device_id: String,
    #[tabled(rename = "Header")]
    header: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(skip)]
    severity: Option<i64>,
    #[tabled(skip)]
    description: String,
    #[tabled(skip)]
    equipment: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id().to_owned(),
            alarm: or_dash(n.alarm_number()),
            alarm_number: n.alarm_number(),
            device_id: n.device_id().to_string(),
            header: n.header().to_owned(),
            status: n.status().to_owned(),
            created: n
                .created_at()
                .map_or_else(|| n.created_datetime().to_owned(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            severity: n.severity(),
            description: n.description().to_owned(),
            equipment: n.equipment().to_owned(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let systems = controller.list_systems().await?;

    let mut rows = Vec::new();
    for system in util::select_systems(&systems, args.system.as_deref())? {
        let notifications = controller.get_notifications(system.id()).await?;
        rows.extend(notifications.iter().map(NotificationRow::from));
    }

    let out = output::render_list(&global.output, &rows, |r| r.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
