// ── Parameter (data point) ──

use std::collections::HashSet;

use myuplink_api::models::{EnumValue, ParameterRecord};
use myuplink_api::{DeviceId, ParameterId};

use crate::classify::{self, Platform};
use crate::config::ClientConfig;

/// Raw value the API uses for "no reading".
pub const NO_VALUE_SENTINEL: f64 = -32768.0;

const MISSING_TEXT: &str = "Text not found";
const SOFT_HYPHEN: char = '\u{00AD}';

/// A named, typed, optionally writable data point of a device.
///
/// Writability and platform are resolved once, when the parameter is built
/// from a fresh fetch, against the config and the owning system's
/// entitlement at that time.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    raw: ParameterRecord,
    device_id: DeviceId,
    writable: bool,
    platform: Platform,
}

impl Parameter {
    pub fn new(
        raw: ParameterRecord,
        device_id: DeviceId,
        config: &ClientConfig,
        premium_manage: bool,
    ) -> Self {
        let id = raw.parameter_id;
        let entitled = premium_manage || config.writable_without_subscription;
        let writable = classify::resolve_writable(
            raw.writable,
            config.writable_override.get(&id).copied(),
            entitled,
        );
        let platform = classify::classify(&raw, writable, config.platform_override.get(&id).copied());

        Self {
            raw,
            device_id,
            writable,
            platform,
        }
    }

    pub fn id(&self) -> ParameterId {
        self.raw.parameter_id
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn raw(&self) -> &ParameterRecord {
        &self.raw
    }

    /// Current reading; `None` when the device reported no value.
    pub fn value(&self) -> Option<f64> {
        self.raw.value.filter(|v| *v != NO_VALUE_SENTINEL)
    }

    /// Reading multiplied by [`scale_value`](Self::scale_value).
    pub fn scaled_value(&self) -> Option<f64> {
        self.value().map(|v| v * self.scale_value())
    }

    pub fn string_value(&self) -> &str {
        &self.raw.str_val
    }

    /// Upstream category, blank when the API returned a placeholder.
    pub fn category(&self) -> &str {
        if self.raw.category.contains(MISSING_TEXT) {
            ""
        } else {
            &self.raw.category
        }
    }

    pub fn name(&self) -> String {
        self.raw.parameter_name.replace(SOFT_HYPHEN, "")
    }

    /// `"<category> <name> (<id>)"`, dropping the category when it is blank
    /// or just repeats the device name.
    pub fn display_name(&self, device_name: &str) -> String {
        let category = self.category();
        if category.is_empty() || category == device_name {
            format!("{} ({})", self.name(), self.id())
        } else {
            format!("{category} {} ({})", self.name(), self.id())
        }
    }

    pub fn unit(&self) -> String {
        classify::normalize_unit(&self.raw.parameter_unit)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.raw.timestamp.as_deref()
    }

    pub fn smart_home_categories(&self) -> &[String] {
        &self.raw.smart_home_categories
    }

    pub fn min_value(&self) -> Option<f64> {
        self.raw.min_value
    }

    pub fn max_value(&self) -> Option<f64> {
        self.raw.max_value
    }

    pub fn step_value(&self) -> Option<f64> {
        self.raw.step_value
    }

    /// Multiplier from raw to presented value; 1.0 when absent or zero.
    pub fn scale_value(&self) -> f64 {
        match self.raw.scale_value {
            Some(scale) if scale != 0.0 => scale,
            _ => 1.0,
        }
    }

    pub fn scaled_min(&self) -> Option<f64> {
        self.min_value().map(|v| v * self.scale_value())
    }

    pub fn scaled_max(&self) -> Option<f64> {
        self.max_value().map(|v| v * self.scale_value())
    }

    pub fn scaled_step(&self) -> Option<f64> {
        self.step_value().map(|v| v * self.scale_value())
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        &self.raw.enum_values
    }

    /// Text of the enum entry matching the current value, if any.
    pub fn enum_text(&self) -> Option<&str> {
        let current = self.value()?;
        self.raw
            .enum_values
            .iter()
            .find(|e| e.value.parse::<f64>().is_ok_and(|v| v == current))
            .map(|e| e.text.as_str())
    }

    pub fn zone_id(&self) -> Option<&str> {
        self.raw.zone_id.as_deref()
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

/// Drop rows repeating an earlier `(parameterId, parameterName)` pair.
///
/// Keeps first-seen order; returns the kept rows and the number dropped.
pub fn dedup_parameters(rows: Vec<ParameterRecord>) -> (Vec<ParameterRecord>, usize) {
    let mut seen = HashSet::with_capacity(rows.len());
    let total = rows.len();
    let kept: Vec<_> = rows
        .into_iter()
        .filter(|row| seen.insert((row.parameter_id, row.parameter_name.clone())))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ParameterRecord {
        serde_json::from_value(value).unwrap()
    }

    fn build(value: serde_json::Value, config: &ClientConfig, premium: bool) -> Parameter {
        Parameter::new(record(value), DeviceId::from("dev"), config, premium)
    }

    #[test]
    fn sentinel_means_no_value() {
        let cfg = ClientConfig::default();
        let p = build(json!({"parameterId": 1, "value": -32768}), &cfg, true);
        assert_eq!(p.value(), None);

        let p = build(json!({"parameterId": 1, "value": -32767}), &cfg, true);
        assert_eq!(p.value(), Some(-32767.0));

        let p = build(json!({"parameterId": 1}), &cfg, true);
        assert_eq!(p.value(), None);
    }

    #[test]
    fn text_cleanup() {
        let cfg = ClientConfig::default();
        let p = build(
            json!({
                "parameterId": 1,
                "category": "Text not found (1234)",
                "parameterName": "Supply\u{00AD}line temp.",
                "parameterUnit": "°c"
            }),
            &cfg,
            true,
        );
        assert_eq!(p.category(), "");
        assert_eq!(p.name(), "Supplyline temp.");
        assert_eq!(p.unit(), "°C");
        assert_eq!(p.display_name("F730"), "Supplyline temp. (1)");
    }

    #[test]
    fn display_name_keeps_distinct_category() {
        let cfg = ClientConfig::default();
        let p = build(
            json!({"parameterId": 40004, "category": "Climate system 1", "parameterName": "Outdoor temp."}),
            &cfg,
            true,
        );
        assert_eq!(p.display_name("F730"), "Climate system 1 Outdoor temp. (40004)");
        assert_eq!(p.display_name("Climate system 1"), "Outdoor temp. (40004)");
    }

    #[test]
    fn zero_scale_reads_as_one() {
        let cfg = ClientConfig::default();
        let p = build(json!({"parameterId": 1, "scaleValue": "0"}), &cfg, true);
        assert_eq!(p.scale_value(), 1.0);

        let p = build(
            json!({"parameterId": 1, "scaleValue": "0.1", "minValue": 50, "maxValue": 300, "stepValue": 5}),
            &cfg,
            true,
        );
        assert_eq!(p.scaled_min(), Some(5.0));
        assert_eq!(p.scaled_max(), Some(30.0));
        assert_eq!(p.scaled_step(), Some(0.5));
    }

    #[test]
    fn writability_needs_entitlement() {
        let cfg = ClientConfig {
            writable_without_subscription: false,
            ..ClientConfig::default()
        };
        let raw = json!({"parameterId": 47011, "writable": true, "minValue": -10, "maxValue": 10});

        assert!(!build(raw.clone(), &cfg, false).is_writable());
        assert!(build(raw.clone(), &cfg, true).is_writable());

        let open = ClientConfig::default();
        let p = build(raw, &open, false);
        assert!(p.is_writable());
        assert_eq!(p.platform(), Platform::Number);
    }

    #[test]
    fn builtin_read_only_override_wins() {
        let cfg = ClientConfig::default();
        let p = build(json!({"parameterId": 781, "writable": true}), &cfg, true);
        assert!(!p.is_writable());
    }

    #[test]
    fn enum_text_matches_current_value() {
        let cfg = ClientConfig::default();
        let p = build(
            json!({"parameterId": 1, "value": 2, "enumValues": [
                {"value": "0", "text": "Auto"},
                {"value": "2", "text": "Manual"}
            ]}),
            &cfg,
            true,
        );
        assert_eq!(p.enum_text(), Some("Manual"));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let rows = vec![
            record(json!({"parameterId": 100, "parameterName": "a", "value": -32768})),
            record(json!({"parameterId": 100, "parameterName": "a", "value": 5})),
            record(json!({"parameterId": 100, "parameterName": "b", "value": 6})),
            record(json!({"parameterId": 101, "parameterName": "a", "value": 1})),
        ];
        let (kept, dropped) = dedup_parameters(rows);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].value, Some(-32768.0));
        assert_eq!(kept[1].parameter_name, "b");
    }
}
