// ── Wire types for the myUplink v2 REST API ──
//
// Field names follow the API's camelCase. Everything that some firmware
// omits or nulls is optional or defaulted; the domain layer in
// `myuplink-core` decides what an absent value means.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use crate::ids::{DeviceId, ParameterId, SystemId, ZoneId};

// ── Pagination ───────────────────────────────────────────────────────

/// Page size used for every paginated listing.
pub const ITEMS_PER_PAGE: u32 = 99;

/// `GET systems/me`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemsPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub items_per_page: u32,
    #[serde(default)]
    pub num_items: u32,
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
}

/// `GET systems/{id}/notifications/active`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub items_per_page: u32,
    #[serde(default)]
    pub num_items: u32,
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
}

// ── Systems ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRecord {
    pub system_id: SystemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub security_level: String,
    #[serde(default)]
    pub has_alarm: bool,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionsResponse {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// Only the subscription type is modeled; `"manage"` unlocks writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Subscription {
    pub fn is_manage(&self) -> bool {
        self.kind == "manage"
    }
}

/// System-wide presence mode.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum SmartHomeMode {
    #[default]
    Default,
    Normal,
    Away,
    Vacation,
    Home,
}

/// Case-insensitive; an unknown or missing mode reads as `Default`.
impl<'de> Deserialize<'de> for SmartHomeMode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        Ok(raw.trim().parse().unwrap_or_else(|_| {
            warn!("unknown smart-home mode {raw:?}, treating as Default");
            Self::Default
        }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartHomeModeBody {
    #[serde(default)]
    pub smart_home_mode: SmartHomeMode,
}

/// Response of `PUT systems/{id}/smart-home-mode`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeChangeResponse {
    #[serde(default)]
    pub payload: Option<ModeChangePayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeChangePayload {
    #[serde(default)]
    pub state: Option<String>,
}

impl ModeChangeResponse {
    pub fn is_ok(&self) -> bool {
        self.payload
            .as_ref()
            .and_then(|p| p.state.as_deref())
            .is_some_and(|s| s == "ok")
    }
}

// ── Devices ──────────────────────────────────────────────────────────

/// Device as embedded in a system listing or returned by `GET devices/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: DeviceId,
    #[serde(default)]
    pub connection_state: String,
    #[serde(default)]
    pub current_fw_version: Option<String>,
    #[serde(default)]
    pub firmware: Option<DeviceFirmware>,
    #[serde(default)]
    pub product: Product,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFirmware {
    #[serde(default)]
    pub current_fw_version: Option<String>,
    #[serde(default)]
    pub desired_fw_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareInfoRecord {
    pub device_id: DeviceId,
    #[serde(default, deserialize_with = "de::opt_int_or_string")]
    pub firmware_id: Option<i64>,
    #[serde(default)]
    pub current_fw_version: Option<String>,
    #[serde(default)]
    pub pending_fw_version: Option<String>,
    #[serde(default)]
    pub desired_fw_version: Option<String>,
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_int_or_string")]
    pub alarm_number: Option<i64>,
    pub device_id: DeviceId,
    #[serde(default, deserialize_with = "de::opt_int_or_string")]
    pub severity: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_datetime: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equip_name: String,
}

// ── Parameters (data points) ─────────────────────────────────────────

/// One row of `GET devices/{id}/points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub parameter_id: ParameterId,
    #[serde(default)]
    pub parameter_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub parameter_unit: String,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub str_val: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub smart_home_categories: Vec<String>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub step_value: Option<f64>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub enum_values: Vec<EnumValue>,
    /// Number or numeric string; unparsable values read as absent.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub scale_value: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub zone_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
}

// ── Zones ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    pub zone_id: ZoneId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub command_only: bool,
    #[serde(default)]
    pub supported_modes: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub setpoint: Option<f64>,
    #[serde(default)]
    pub setpoint_heat: Option<f64>,
    #[serde(default)]
    pub setpoint_cool: Option<f64>,
    #[serde(default)]
    pub setpoint_range_min: Option<f64>,
    #[serde(default)]
    pub setpoint_range_max: Option<f64>,
    #[serde(default = "default_true")]
    pub is_celsius: bool,
    #[serde(default)]
    pub indoor_co2: Option<i64>,
    #[serde(default)]
    pub indoor_humidity: Option<f64>,
}

fn default_true() -> bool {
    true
}

// ── Lenient deserializers ────────────────────────────────────────────

pub(crate) mod de {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Int(i64),
        Float(f64),
        Str(String),
    }

    pub(crate) fn int_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match NumOrStr::deserialize(d)? {
            NumOrStr::Int(i) => Ok(i),
            #[allow(clippy::cast_possible_truncation)]
            NumOrStr::Float(f) if f.fract() == 0.0 => Ok(f as i64),
            NumOrStr::Float(f) => Err(D::Error::custom(format!("expected integer id, got {f}"))),
            NumOrStr::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected integer id, got {s:?}"))),
        }
    }

    pub(crate) fn opt_int_or_string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<i64>, D::Error> {
        #[allow(clippy::cast_possible_truncation)]
        Ok(match Option::<NumOrStr>::deserialize(d)? {
            Some(NumOrStr::Int(i)) => Some(i),
            Some(NumOrStr::Float(f)) => Some(f as i64),
            Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
            None => None,
        })
    }

    pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        #[allow(clippy::cast_precision_loss)]
        Ok(match Option::<NumOrStr>::deserialize(d)? {
            Some(NumOrStr::Int(i)) => Some(i as f64),
            Some(NumOrStr::Float(f)) => Some(f),
            Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
            None => None,
        })
    }

    pub(crate) fn opt_string_or_number<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<NumOrStr>::deserialize(d)? {
            Some(NumOrStr::Int(i)) => Some(i.to_string()),
            Some(NumOrStr::Float(f)) => Some(f.to_string()),
            Some(NumOrStr::Str(s)) => Some(s),
            None => None,
        })
    }

    pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parameter_row_with_string_scale_and_numeric_zone() {
        let row: ParameterRecord = serde_json::from_value(json!({
            "category": "NIBE SMO 20",
            "parameterId": "40004",
            "parameterName": "Outdoor temp. (BT1)",
            "parameterUnit": "°C",
            "writable": false,
            "timestamp": "2024-01-07T12:00:00+00:00",
            "value": -3.4,
            "strVal": "-3.4°C",
            "smartHomeCategories": null,
            "minValue": null,
            "maxValue": null,
            "stepValue": 1.0,
            "enumValues": [],
            "scaleValue": "0.1",
            "zoneId": 2
        }))
        .unwrap();

        assert_eq!(row.parameter_id, ParameterId::new(40004));
        assert_eq!(row.scale_value, Some(0.1));
        assert_eq!(row.zone_id.as_deref(), Some("2"));
        assert!(row.smart_home_categories.is_empty());
        assert_eq!(row.min_value, None);
    }

    #[test]
    fn unparsable_scale_reads_as_absent() {
        let row: ParameterRecord = serde_json::from_value(json!({
            "parameterId": 1,
            "scaleValue": "n/a"
        }))
        .unwrap();
        assert_eq!(row.scale_value, None);
    }

    #[test]
    fn mode_change_requires_ok_state() {
        let ok: ModeChangeResponse =
            serde_json::from_value(json!({"payload": {"state": "ok"}})).unwrap();
        let pending: ModeChangeResponse =
            serde_json::from_value(json!({"payload": {"state": "pending"}})).unwrap();
        let empty: ModeChangeResponse = serde_json::from_value(json!({})).unwrap();

        assert!(ok.is_ok());
        assert!(!pending.is_ok());
        assert!(!empty.is_ok());
    }

    #[test]
    fn smart_home_mode_parses_case_insensitively() {
        assert_eq!("vacation".parse::<SmartHomeMode>().unwrap(), SmartHomeMode::Vacation);
        assert_eq!(SmartHomeMode::Away.to_string(), "Away");
        assert!("party".parse::<SmartHomeMode>().is_err());
    }

    #[test]
    fn smart_home_mode_body_is_lenient() {
        let lower: SmartHomeModeBody =
            serde_json::from_value(json!({"smartHomeMode": "away"})).unwrap();
        let unknown: SmartHomeModeBody =
            serde_json::from_value(json!({"smartHomeMode": "Party"})).unwrap();
        let null: SmartHomeModeBody =
            serde_json::from_value(json!({"smartHomeMode": null})).unwrap();
        let missing: SmartHomeModeBody = serde_json::from_value(json!({})).unwrap();

        assert_eq!(lower.smart_home_mode, SmartHomeMode::Away);
        assert_eq!(unknown.smart_home_mode, SmartHomeMode::Default);
        assert_eq!(null.smart_home_mode, SmartHomeMode::Default);
        assert_eq!(missing.smart_home_mode, SmartHomeMode::Default);
    }

    #[test]
    fn subscription_manage_detection() {
        let subs: SubscriptionsResponse = serde_json::from_value(json!({
            "subscriptions": [{"type": "history", "validUntil": null}, {"type": "manage"}]
        }))
        .unwrap();
        assert!(subs.subscriptions.iter().any(Subscription::is_manage));
    }
}
