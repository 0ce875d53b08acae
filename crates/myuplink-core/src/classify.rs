// ── Parameter classification ──
//
// Pure functions that decide which UI category a data point belongs to and
// whether it may be written. Nothing here touches the network.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use myuplink_api::models::{EnumValue, ParameterRecord};

/// UI category a parameter is presented as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    Switch,
    BinarySensor,
    Select,
    Number,
    Sensor,
}

/// Two-state shape: an off/on enum pair or a 0..1 range stepping by 1.
pub fn is_boolean_shape(record: &ParameterRecord) -> bool {
    match record.enum_values.as_slice() {
        [off, on] => is_off_on_pair(off, on),
        [] => {
            record.min_value == Some(0.0)
                && record.max_value == Some(1.0)
                && record.step_value == Some(1.0)
        }
        _ => false,
    }
}

fn is_off_on_pair(off: &EnumValue, on: &EnumValue) -> bool {
    (off.value == "0" && on.value == "1")
        || (off.text.eq_ignore_ascii_case("off") && on.text.eq_ignore_ascii_case("on"))
}

/// Infer the platform of a parameter.
///
/// `override_platform` wins unconditionally; `writable` must already have
/// been resolved with [`resolve_writable`].
pub fn classify(
    record: &ParameterRecord,
    writable: bool,
    override_platform: Option<Platform>,
) -> Platform {
    if let Some(platform) = override_platform {
        return platform;
    }

    if is_boolean_shape(record) {
        return if writable {
            Platform::Switch
        } else {
            Platform::BinarySensor
        };
    }

    if !record.enum_values.is_empty() && writable {
        return Platform::Select;
    }

    let non_zero = |v: Option<f64>| v.is_some_and(|v| v != 0.0);
    if (non_zero(record.max_value) || non_zero(record.min_value)) && writable {
        return Platform::Number;
    }

    Platform::Sensor
}

/// Effective writability of a parameter.
///
/// A per-id override is authoritative. Otherwise the raw flag counts only
/// when the system is entitled to write (premium `manage` subscription or
/// write-without-subscription enabled).
pub fn resolve_writable(raw_writable: bool, override_writable: Option<bool>, entitled: bool) -> bool {
    match override_writable {
        Some(writable) => writable,
        None => entitled && raw_writable,
    }
}

// ── Units ────────────────────────────────────────────────────────────

const KNOWN_UNITS: &[&str] = &[
    // energy
    "Wh", "kWh", "MWh", "MJ", "GJ",
    // frequency
    "Hz", "kHz", "MHz", "GHz",
    // power
    "W", "kW", "MW", "BTU/h",
    // temperature
    "°C", "°F", "K",
    // time
    "μs", "ms", "s", "min", "h", "d", "w", "m", "y",
];

/// Canonical spelling of a known unit, matched case-insensitively.
///
/// Unknown and empty units pass through unchanged.
pub fn normalize_unit(unit: &str) -> String {
    if unit.is_empty() {
        return String::new();
    }
    KNOWN_UNITS
        .iter()
        .find(|known| known.to_lowercase() == unit.to_lowercase())
        .map_or_else(|| unit.to_owned(), |known| (*known).to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(extra: serde_json::Value) -> ParameterRecord {
        let mut base = json!({ "parameterId": 1, "parameterName": "p" });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn zero_one_enum() -> serde_json::Value {
        json!({"enumValues": [
            {"value": "0", "text": "Off"},
            {"value": "1", "text": "On"}
        ]})
    }

    #[test]
    fn zero_one_enum_is_switch_when_writable() {
        assert_eq!(classify(&record(zero_one_enum()), true, None), Platform::Switch);
    }

    #[test]
    fn zero_one_enum_is_binary_sensor_when_read_only() {
        assert_eq!(
            classify(&record(zero_one_enum()), false, None),
            Platform::BinarySensor
        );
    }

    #[test]
    fn off_on_texts_count_as_boolean() {
        let r = record(json!({"enumValues": [
            {"value": "10", "text": "OFF"},
            {"value": "20", "text": "on"}
        ]}));
        assert!(is_boolean_shape(&r));
    }

    #[test]
    fn zero_to_one_range_counts_as_boolean() {
        let r = record(json!({"minValue": 0, "maxValue": 1, "stepValue": 1}));
        assert_eq!(classify(&r, true, None), Platform::Switch);
    }

    #[test]
    fn larger_enum_is_select_only_when_writable() {
        let r = record(json!({"enumValues": [
            {"value": "0", "text": "Auto"},
            {"value": "1", "text": "Manual"},
            {"value": "2", "text": "Add. heat only"}
        ]}));
        assert_eq!(classify(&r, true, None), Platform::Select);
        assert_eq!(classify(&r, false, None), Platform::Sensor);
    }

    #[test]
    fn bounded_writable_value_is_number() {
        let r = record(json!({"minValue": 0, "maxValue": 100, "stepValue": 1}));
        assert_eq!(classify(&r, true, None), Platform::Number);
        assert_eq!(classify(&r, false, None), Platform::Sensor);
    }

    #[test]
    fn unbounded_writable_value_is_sensor() {
        assert_eq!(classify(&record(json!({})), true, None), Platform::Sensor);
    }

    #[test]
    fn override_beats_shape() {
        assert_eq!(
            classify(&record(zero_one_enum()), true, Some(Platform::Sensor)),
            Platform::Sensor
        );
    }

    #[test]
    fn writable_override_is_authoritative() {
        assert!(!resolve_writable(true, None, false));
        assert!(resolve_writable(true, None, true));
        assert!(!resolve_writable(true, Some(false), true));
        assert!(resolve_writable(false, Some(true), false));
    }

    #[test]
    fn units_are_canonicalized() {
        assert_eq!(normalize_unit("kwh"), "kWh");
        assert_eq!(normalize_unit("°c"), "°C");
        assert_eq!(normalize_unit("HZ"), "Hz");
        assert_eq!(normalize_unit("DM"), "DM");
        assert_eq!(normalize_unit(""), "");
    }

    #[test]
    fn platform_parses_snake_case() {
        assert_eq!("binary_sensor".parse::<Platform>().unwrap(), Platform::BinarySensor);
        assert_eq!(Platform::Switch.to_string(), "switch");
    }
}
