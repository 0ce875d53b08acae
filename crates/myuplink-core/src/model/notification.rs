// ── Active notification (alarm) ──

use chrono::{DateTime, NaiveDateTime, Utc};

use myuplink_api::DeviceId;
use myuplink_api::models::NotificationRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    raw: NotificationRecord,
}

impl Notification {
    pub fn new(raw: NotificationRecord) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> &str {
        &self.raw.id
    }

    pub fn alarm_number(&self) -> Option<i64> {
        self.raw.alarm_number
    }

    /// Only used to attach the notification to its device.
    pub fn device_id(&self) -> &DeviceId {
        &self.raw.device_id
    }

    pub fn severity(&self) -> Option<i64> {
        self.raw.severity
    }

    pub fn status(&self) -> &str {
        &self.raw.status
    }

    pub fn header(&self) -> &str {
        &self.raw.header
    }

    pub fn description(&self) -> &str {
        &self.raw.description
    }

    pub fn equipment(&self) -> &str {
        &self.raw.equip_name
    }

    /// Creation time as sent by the API.
    pub fn created_datetime(&self) -> &str {
        &self.raw.created_datetime
    }

    /// Creation time; offset-less timestamps are taken as UTC.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.raw.created_datetime.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}
