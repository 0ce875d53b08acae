// ── Firmware info ──

use myuplink_api::DeviceId;
use myuplink_api::models::FirmwareInfoRecord;

/// Firmware versions of a device. Blank version strings read as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareInfo {
    raw: FirmwareInfoRecord,
}

fn non_blank(version: Option<&String>) -> Option<&str> {
    version.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl FirmwareInfo {
    pub fn new(raw: FirmwareInfoRecord) -> Self {
        Self { raw }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.raw.device_id
    }

    pub fn firmware_id(&self) -> Option<i64> {
        self.raw.firmware_id
    }

    pub fn current_version(&self) -> Option<&str> {
        non_blank(self.raw.current_fw_version.as_ref())
    }

    pub fn pending_version(&self) -> Option<&str> {
        non_blank(self.raw.pending_fw_version.as_ref())
    }

    pub fn desired_version(&self) -> Option<&str> {
        non_blank(self.raw.desired_fw_version.as_ref())
    }

    pub fn update_available(&self) -> bool {
        match (self.current_version(), self.desired_version()) {
            (Some(current), Some(desired)) => current != desired,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(current: &str, pending: &str, desired: &str) -> FirmwareInfo {
        FirmwareInfo::new(
            serde_json::from_value(json!({
                "deviceId": "dev",
                "firmwareId": "7",
                "currentFwVersion": current,
                "pendingFwVersion": pending,
                "desiredFwVersion": desired
            }))
            .unwrap(),
        )
    }

    #[test]
    fn blank_versions_are_absent() {
        let fw = info(" 9682R7 ", "   ", "");
        assert_eq!(fw.current_version(), Some("9682R7"));
        assert_eq!(fw.pending_version(), None);
        assert_eq!(fw.desired_version(), None);
        assert_eq!(fw.firmware_id(), Some(7));
        assert!(!fw.update_available());
    }

    #[test]
    fn update_available_when_versions_differ() {
        assert!(info("9682R7", "", "9682R8").update_available());
        assert!(!info("9682R8", "", "9682R8").update_available());
    }
}
