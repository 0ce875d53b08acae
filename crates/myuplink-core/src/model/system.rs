// ── System ──

use myuplink_api::models::SystemRecord;
use myuplink_api::{DeviceId, SmartHomeMode, SystemId};
use tracing::debug;

use super::Device;
use crate::controller::Controller;
use crate::error::CoreError;

const ADMIN: &str = "admin";

/// An account-owned installation and its devices.
///
/// The device list is built once, from the listing the system was created
/// with. Later listings replace the payloads of known devices but never
/// add, drop or reorder them.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    raw: SystemRecord,
    devices: Vec<Device>,
    premium_manage: bool,
    smart_home_mode: SmartHomeMode,
}

impl System {
    pub fn new(raw: SystemRecord) -> Self {
        let devices = raw
            .devices
            .iter()
            .cloned()
            .map(|d| Device::new(d, raw.system_id.clone(), raw.name.clone()))
            .collect();
        Self {
            raw,
            devices,
            premium_manage: true,
            smart_home_mode: SmartHomeMode::Default,
        }
    }

    /// Swap in a newer listing payload, keeping the device list.
    pub(crate) fn replace_record(&mut self, raw: SystemRecord) {
        for device in &mut self.devices {
            match raw.devices.iter().find(|d| &d.id == device.id()) {
                Some(fresh) => device.replace_record(fresh.clone(), &raw.name),
                None => device.rename_system(&raw.name),
            }
        }
        self.raw = raw;
    }

    pub fn id(&self) -> &SystemId {
        &self.raw.system_id
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn raw(&self) -> &SystemRecord {
        &self.raw
    }

    pub fn security_level(&self) -> &str {
        &self.raw.security_level
    }

    pub fn is_admin(&self) -> bool {
        self.raw.security_level.eq_ignore_ascii_case(ADMIN)
    }

    pub fn has_alarm(&self) -> bool {
        self.raw.has_alarm
    }

    pub fn country(&self) -> Option<&str> {
        self.raw.country.as_deref()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id() == id)
    }

    /// `true` until a refresh proves otherwise.
    pub fn premium_manage(&self) -> bool {
        self.premium_manage
    }

    pub fn smart_home_mode(&self) -> SmartHomeMode {
        self.smart_home_mode
    }

    /// Entitlement, smart-home mode and notifications, then every device
    /// in order. The first failure aborts the refresh.
    pub async fn refresh(&mut self, controller: &Controller) -> Result<(), CoreError> {
        debug!("refreshing system {}", self.id());
        let config = controller.config();

        self.premium_manage = controller.get_premium_manage(self.id()).await?;
        if config.enable_smart_home_mode {
            self.smart_home_mode = controller.get_smart_home_mode(self.id()).await?;
        }

        let notifications = if config.fetch_notifications {
            Some(controller.get_notifications(self.id()).await?)
        } else {
            None
        };

        let premium_manage = self.premium_manage;
        for device in &mut self.devices {
            if let Some(all) = &notifications {
                device.notifications = all
                    .iter()
                    .filter(|n| n.device_id() == device.id())
                    .cloned()
                    .collect();
            }
            device.refresh(controller, premium_manage).await?;
        }
        Ok(())
    }
}
