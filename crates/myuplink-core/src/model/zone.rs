// ── Smart-home zone ──

use myuplink_api::ZoneId;
use myuplink_api::models::ZoneRecord;

/// Climate-controlled area of a device. Ids are only unique per device.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    raw: ZoneRecord,
}

impl Zone {
    pub fn new(raw: ZoneRecord) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> ZoneId {
        self.raw.zone_id
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn is_command_only(&self) -> bool {
        self.raw.command_only
    }

    pub fn supported_modes(&self) -> Option<&str> {
        self.raw.supported_modes.as_deref()
    }

    pub fn mode(&self) -> Option<&str> {
        self.raw.mode.as_deref()
    }

    pub fn temperature(&self) -> Option<f64> {
        self.raw.temperature
    }

    pub fn setpoint(&self) -> Option<f64> {
        self.raw.setpoint
    }

    pub fn setpoint_heating(&self) -> Option<f64> {
        self.raw.setpoint_heat
    }

    pub fn setpoint_cooling(&self) -> Option<f64> {
        self.raw.setpoint_cool
    }

    pub fn setpoint_range(&self) -> (Option<f64>, Option<f64>) {
        (self.raw.setpoint_range_min, self.raw.setpoint_range_max)
    }

    /// `false` means temperatures are in Fahrenheit.
    pub fn is_celsius(&self) -> bool {
        self.raw.is_celsius
    }

    pub fn indoor_co2(&self) -> Option<i64> {
        self.raw.indoor_co2
    }

    pub fn indoor_humidity(&self) -> Option<f64> {
        self.raw.indoor_humidity
    }

    pub fn temperature_unit(&self) -> &'static str {
        if self.is_celsius() { "°C" } else { "°F" }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zone(value: serde_json::Value) -> Zone {
        Zone::new(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn missing_unit_flag_means_celsius() {
        let z = zone(json!({"zoneId": 3, "name": "Hall"}));
        assert!(z.is_celsius());
        assert_eq!(z.temperature_unit(), "°C");
        assert_eq!(z.setpoint_range(), (None, None));
        assert!(!z.is_command_only());
    }

    #[test]
    fn fahrenheit_zone_with_range() {
        let z = zone(json!({
            "zoneId": "4",
            "name": "Den",
            "isCelsius": false,
            "setpointRangeMin": 41.0,
            "setpointRangeMax": 95.0,
            "setpointHeat": 68.0,
            "indoorCo2": 612
        }));
        assert_eq!(z.id(), ZoneId::new(4));
        assert_eq!(z.temperature_unit(), "°F");
        assert_eq!(z.setpoint_range(), (Some(41.0), Some(95.0)));
        assert_eq!(z.setpoint_heating(), Some(68.0));
        assert_eq!(z.setpoint_cooling(), None);
        assert_eq!(z.indoor_co2(), Some(612));
    }
}
