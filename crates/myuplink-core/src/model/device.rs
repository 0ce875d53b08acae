// ── Device ──

use myuplink_api::models::DeviceRecord;
use myuplink_api::{DeviceId, ParameterId, SystemId};
use tracing::debug;

use super::{FirmwareInfo, Notification, Parameter, Zone};
use crate::controller::Controller;
use crate::error::CoreError;

const CONNECTED: &str = "Connected";

/// A physical unit (heat pump, indoor module, ...) within a system.
///
/// Instances live as long as their system; refreshes replace the child
/// collections wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    raw: DeviceRecord,
    system_id: SystemId,
    system_name: String,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) duplicate_parameters: usize,
    pub(crate) zones: Vec<Zone>,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) firmware_info: Option<FirmwareInfo>,
}

impl Device {
    pub fn new(raw: DeviceRecord, system_id: SystemId, system_name: String) -> Self {
        Self {
            raw,
            system_id,
            system_name,
            parameters: Vec::new(),
            duplicate_parameters: 0,
            zones: Vec::new(),
            notifications: Vec::new(),
            firmware_info: None,
        }
    }

    pub(crate) fn replace_record(&mut self, raw: DeviceRecord, system_name: &str) {
        self.raw = raw;
        system_name.clone_into(&mut self.system_name);
    }

    pub(crate) fn rename_system(&mut self, system_name: &str) {
        system_name.clone_into(&mut self.system_name);
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn id(&self) -> &DeviceId {
        &self.raw.id
    }

    pub fn system_id(&self) -> &SystemId {
        &self.system_id
    }

    pub fn raw(&self) -> &DeviceRecord {
        &self.raw
    }

    pub fn product_name(&self) -> &str {
        &self.raw.product.name
    }

    /// Product name followed by system name, once if they are identical.
    /// Just the product name while the system is unknown.
    pub fn name(&self) -> String {
        let product = self.product_name();
        if product == self.system_name || self.system_name.is_empty() {
            product.to_owned()
        } else {
            format!("{product} {}", self.system_name)
        }
    }

    /// First word of the name, when the name has more than one word.
    pub fn manufacturer(&self) -> Option<String> {
        let name = self.name();
        let mut words = name.split_whitespace();
        let first = words.next()?;
        words.next().map(|_| first.to_owned())
    }

    /// Name without the manufacturer word.
    pub fn model(&self) -> String {
        let name = self.name();
        let words: Vec<&str> = name.split_whitespace().collect();
        match words.as_slice() {
            [] => String::new(),
            [only] => (*only).to_owned(),
            [_, rest @ ..] => rest.join(" "),
        }
    }

    pub fn serial_number(&self) -> &str {
        &self.raw.product.serial_number
    }

    pub fn connection_state(&self) -> &str {
        &self.raw.connection_state
    }

    pub fn is_connected(&self) -> bool {
        self.raw.connection_state == CONNECTED
    }

    pub fn current_firmware_version(&self) -> Option<&str> {
        match &self.raw.firmware {
            Some(fw) => fw.current_fw_version.as_deref(),
            None => self.raw.current_fw_version.as_deref(),
        }
    }

    pub fn desired_firmware_version(&self) -> Option<&str> {
        self.raw
            .firmware
            .as_ref()
            .and_then(|fw| fw.desired_fw_version.as_deref())
    }

    // ── Children ─────────────────────────────────────────────────────

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, id: ParameterId) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id() == id)
    }

    /// Rows discarded as duplicates in the last parameter fetch.
    pub fn duplicate_parameters(&self) -> usize {
        self.duplicate_parameters
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn firmware_info(&self) -> Option<&FirmwareInfo> {
        self.firmware_info.as_ref()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Re-fetch parameters, then firmware and zones when enabled.
    pub async fn refresh(
        &mut self,
        controller: &Controller,
        premium_manage: bool,
    ) -> Result<(), CoreError> {
        debug!("refreshing device {}", self.id());
        let fetched = controller.get_parameters(self.id(), premium_manage).await?;
        self.parameters = fetched.parameters;
        self.duplicate_parameters = fetched.duplicates;

        let config = controller.config();
        if config.fetch_firmware {
            self.firmware_info = Some(controller.get_firmware_info(self.id()).await?);
        }
        if config.fetch_zones {
            self.zones = controller.get_zones(self.id()).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(product: &str, system: &str) -> Device {
        let raw = serde_json::from_value(json!({
            "id": "dev",
            "connectionState": "Connected",
            "currentFwVersion": "9682R7",
            "product": {"serialNumber": "0123", "name": product}
        }))
        .unwrap();
        Device::new(raw, SystemId::from("sys"), system.to_owned())
    }

    #[test]
    fn name_joins_distinct_parts() {
        let d = device("NIBE F730", "Home");
        assert_eq!(d.name(), "NIBE F730 Home");
        assert_eq!(d.manufacturer().as_deref(), Some("NIBE"));
        assert_eq!(d.model(), "F730 Home");
    }

    #[test]
    fn identical_parts_collapse() {
        let d = device("F730", "F730");
        assert_eq!(d.name(), "F730");
        assert_eq!(d.manufacturer(), None);
        assert_eq!(d.model(), "F730");
    }

    #[test]
    fn firmware_falls_back_to_flat_field() {
        let d = device("F730", "Home");
        assert_eq!(d.current_firmware_version(), Some("9682R7"));
        assert_eq!(d.desired_firmware_version(), None);
        assert!(d.is_connected());
    }
}
