// ── Client behavior configuration ──
//
// `ClientOptions` is what a host application stores: booleans plus JSON
// strings typed in by a user. `ClientConfig` is the parsed form the
// controller works with. Parsing never fails; malformed input falls back
// to the built-in defaults and is logged.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use myuplink_api::{DEFAULT_THROTTLE_DELAY, ParameterId, TransportConfig};

use crate::classify::Platform;

const DEFAULT_BINARY_SENSORS: &[i64] = &[10733, 44703];

const DEFAULT_SWITCHES: &[i64] = &[
    47050, 47394, 47635, 47669, 47771, 47805, 47839, 47975, 48009, 48043, 48442,
];

const DEFAULT_READ_ONLY: &[i64] = &[781, 1755, 1959, 1961, 1963, 15753];

/// Parameters whose shape misleads the classifier.
pub fn default_platform_override() -> HashMap<ParameterId, Platform> {
    DEFAULT_BINARY_SENSORS
        .iter()
        .map(|&id| (ParameterId::new(id), Platform::BinarySensor))
        .chain(
            DEFAULT_SWITCHES
                .iter()
                .map(|&id| (ParameterId::new(id), Platform::Switch)),
        )
        .collect()
}

/// Parameters the API reports as writable but rejects writes to.
pub fn default_writable_override() -> HashMap<ParameterId, bool> {
    DEFAULT_READ_ONLY
        .iter()
        .map(|&id| (ParameterId::new(id), false))
        .collect()
}

// ── Raw options ─────────────────────────────────────────────────────

/// String-typed options as stored by a host application.
///
/// `None` means "not set" and selects the default. The JSON fields hold
/// an object keyed by parameter id (overrides) or an array of ids (lists).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub platform_override: Option<String>,
    pub writable_override: Option<String>,
    pub parameter_whitelist: Option<String>,
    pub additional_parameter: Option<String>,
    pub fetch_firmware: Option<bool>,
    pub fetch_notifications: Option<bool>,
    pub enable_smart_home_mode: Option<bool>,
    pub fetch_zones: Option<bool>,
    pub writable_without_subscription: Option<bool>,
    pub language: Option<String>,
    pub throttle_delay_secs: Option<u64>,
}

// ── Parsed config ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub platform_override: HashMap<ParameterId, Platform>,
    pub writable_override: HashMap<ParameterId, bool>,
    /// When non-empty, only these (plus `additional_parameter`) are fetched.
    pub parameter_whitelist: Vec<ParameterId>,
    pub additional_parameter: Vec<ParameterId>,
    pub fetch_firmware: bool,
    pub fetch_notifications: bool,
    pub enable_smart_home_mode: bool,
    pub fetch_zones: bool,
    pub writable_without_subscription: bool,
    pub language: Option<String>,
    pub throttle_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            platform_override: default_platform_override(),
            writable_override: default_writable_override(),
            parameter_whitelist: Vec::new(),
            additional_parameter: Vec::new(),
            fetch_firmware: true,
            fetch_notifications: true,
            enable_smart_home_mode: true,
            fetch_zones: false,
            writable_without_subscription: true,
            language: None,
            throttle_delay: DEFAULT_THROTTLE_DELAY,
        }
    }
}

impl From<&ClientOptions> for ClientConfig {
    fn from(options: &ClientOptions) -> Self {
        let defaults = Self::default();
        Self {
            platform_override: options
                .platform_override
                .as_deref()
                .map_or(defaults.platform_override, |raw| {
                    parse_override("platform_override", raw).unwrap_or_else(default_platform_override)
                }),
            writable_override: options
                .writable_override
                .as_deref()
                .map_or(defaults.writable_override, |raw| {
                    parse_override("writable_override", raw).unwrap_or_else(default_writable_override)
                }),
            parameter_whitelist: options
                .parameter_whitelist
                .as_deref()
                .map(|raw| parse_id_list("parameter_whitelist", raw))
                .unwrap_or_default(),
            additional_parameter: options
                .additional_parameter
                .as_deref()
                .map(|raw| parse_id_list("additional_parameter", raw))
                .unwrap_or_default(),
            fetch_firmware: options.fetch_firmware.unwrap_or(defaults.fetch_firmware),
            fetch_notifications: options
                .fetch_notifications
                .unwrap_or(defaults.fetch_notifications),
            enable_smart_home_mode: options
                .enable_smart_home_mode
                .unwrap_or(defaults.enable_smart_home_mode),
            fetch_zones: options.fetch_zones.unwrap_or(defaults.fetch_zones),
            writable_without_subscription: options
                .writable_without_subscription
                .unwrap_or(defaults.writable_without_subscription),
            language: options
                .language
                .clone()
                .filter(|lang| !lang.trim().is_empty()),
            throttle_delay: options
                .throttle_delay_secs
                .map_or(defaults.throttle_delay, Duration::from_secs),
        }
    }
}

impl ClientConfig {
    /// Point queries for one device refresh.
    ///
    /// With a whitelist: a single query for whitelist ∪ additional.
    /// Without: one unfiltered query, plus one for the additional ids.
    pub fn parameter_filters(&self) -> Vec<Vec<ParameterId>> {
        if self.parameter_whitelist.is_empty() {
            let mut filters = vec![Vec::new()];
            if !self.additional_parameter.is_empty() {
                filters.push(self.additional_parameter.clone());
            }
            filters
        } else {
            let mut merged = self.parameter_whitelist.clone();
            for id in &self.additional_parameter {
                if !merged.contains(id) {
                    merged.push(*id);
                }
            }
            vec![merged]
        }
    }

    /// Copy the request-level settings into a transport config.
    pub fn apply_to(&self, transport: &mut TransportConfig) {
        transport.language.clone_from(&self.language);
        transport.throttle_delay = self.throttle_delay;
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn parse_id(value: &Value) -> Option<ParameterId> {
    match value {
        Value::Number(n) => n.as_i64().map(ParameterId::new),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse `{"<id>": <value>}`. Entries with a bad key or value are skipped;
/// a document that is not a JSON object yields `None`.
fn parse_override<T>(field: &str, raw: &str) -> Option<HashMap<ParameterId, T>>
where
    T: serde::de::DeserializeOwned,
{
    let entries: BTreeMap<String, Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("{field}: malformed JSON ({e}), using defaults");
            return None;
        }
    };

    let mut parsed = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        let Ok(id) = key.trim().parse::<ParameterId>() else {
            warn!("{field}: ignoring non-numeric parameter id {key:?}");
            continue;
        };
        match serde_json::from_value::<T>(value) {
            Ok(value) => {
                parsed.insert(id, value);
            }
            Err(e) => warn!("{field}: ignoring entry for {id}: {e}"),
        }
    }
    Some(parsed)
}

/// Parse `[<id>, ...]`; malformed input yields an empty list.
fn parse_id_list(field: &str, raw: &str) -> Vec<ParameterId> {
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(values) => values
            .iter()
            .filter_map(|value| {
                let id = parse_id(value);
                if id.is_none() {
                    warn!("{field}: ignoring invalid parameter id {value}");
                }
                id
            })
            .collect(),
        Err(e) => {
            warn!("{field}: malformed JSON ({e}), using an empty list");
            Vec::new()
        }
    }
}
