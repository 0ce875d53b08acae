// ── Controller ──
//
// Issues endpoint calls through the shared `ApiClient`, composes the
// system graph and publishes it. A refresh pass works on a private copy of
// the last published graph; the copy replaces it only when the whole pass
// succeeded.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use myuplink_api::{
    ApiClient, DeviceId, ParameterId, SmartHomeMode, SystemId, TokenProvider, TransportConfig,
};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{Device, FirmwareInfo, Notification, Parameter, System, Zone, dedup_parameters};

/// Result of one parameter fetch for a device.
#[derive(Debug, Clone, Default)]
pub struct ParameterFetch {
    pub parameters: Vec<Parameter>,
    /// Rows discarded as duplicates of an earlier `(id, name)` pair.
    pub duplicates: usize,
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. All clones share the API
/// client (and with it the request gate), the refresh lock and the
/// published graph.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    api: ApiClient,
    config: ClientConfig,
    systems: ArcSwap<Vec<System>>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("api", &self.inner.api)
            .field("systems", &self.inner.systems.load().len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    pub fn new(api: ApiClient, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                api,
                config,
                systems: ArcSwap::from_pointee(Vec::new()),
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    /// Build the API client from `transport` with the config's language
    /// and throttle delay applied.
    pub fn connect(
        mut transport: TransportConfig,
        tokens: Arc<dyn TokenProvider>,
        config: ClientConfig,
    ) -> Result<Self, CoreError> {
        config.apply_to(&mut transport);
        let api = ApiClient::new(&transport, tokens)?;
        Ok(Self::new(api, config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ── Graph ────────────────────────────────────────────────────────

    /// Last successfully refreshed graph. Empty before the first refresh.
    pub fn systems_snapshot(&self) -> Arc<Vec<System>> {
        self.inner.systems.load_full()
    }

    /// Fetch all systems and refresh every one of them.
    ///
    /// Systems already known by id are reused, keeping their device list.
    /// On error the previously published graph stays in place.
    pub async fn get_systems(&self) -> Result<Arc<Vec<System>>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;
        debug!("fetching systems");

        let records = self.inner.api.list_systems().await?;
        let previous = self.inner.systems.load_full();

        let mut systems = Vec::with_capacity(records.len());
        for record in records {
            let mut system = match previous.iter().find(|s| s.id() == &record.system_id) {
                Some(known) => {
                    let mut system = known.clone();
                    system.replace_record(record);
                    system
                }
                None => System::new(record),
            };
            system.refresh(self).await?;
            systems.push(system);
        }

        let systems = Arc::new(systems);
        self.inner.systems.store(Arc::clone(&systems));
        info!("refreshed {} system(s)", systems.len());
        Ok(systems)
    }

    /// Fetch the account's systems without refreshing them. The published
    /// graph is left alone.
    pub async fn list_systems(&self) -> Result<Vec<System>, CoreError> {
        debug!("listing systems");
        let records = self.inner.api.list_systems().await?;
        Ok(records.into_iter().map(System::new).collect())
    }

    /// Locate a device in the published graph with its owning system.
    pub fn find_device(&self, device_id: &DeviceId) -> Result<(System, Device), CoreError> {
        let snapshot = self.systems_snapshot();
        snapshot
            .iter()
            .find_map(|s| s.device(device_id).map(|d| (s.clone(), d.clone())))
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: device_id.to_string(),
            })
    }

    pub fn find_system(&self, system_id: &SystemId) -> Result<System, CoreError> {
        self.systems_snapshot()
            .iter()
            .find(|s| s.id() == system_id)
            .cloned()
            .ok_or_else(|| CoreError::SystemNotFound {
                identifier: system_id.to_string(),
            })
    }

    // ── System endpoints ─────────────────────────────────────────────

    pub async fn get_premium_manage(&self, system_id: &SystemId) -> Result<bool, CoreError> {
        debug!("fetching subscriptions for system {system_id}");
        Ok(self.inner.api.get_premium_manage(system_id).await?)
    }

    pub async fn get_smart_home_mode(&self, system_id: &SystemId) -> Result<SmartHomeMode, CoreError> {
        debug!("fetching smart home mode for system {system_id}");
        Ok(self.inner.api.get_smart_home_mode(system_id).await?)
    }

    /// Set the system's smart-home mode. `true` iff the API confirmed it.
    pub async fn put_smart_home_mode(
        &self,
        system_id: &SystemId,
        mode: SmartHomeMode,
    ) -> Result<bool, CoreError> {
        Ok(self.inner.api.put_smart_home_mode(system_id, mode).await?)
    }

    pub async fn get_notifications(&self, system_id: &SystemId) -> Result<Vec<Notification>, CoreError> {
        debug!("fetching notifications for system {system_id}");
        let records = self.inner.api.list_active_notifications(system_id).await?;
        Ok(records.into_iter().map(Notification::new).collect())
    }

    // ── Device endpoints ─────────────────────────────────────────────

    /// Fetch a single device. System context comes from the published
    /// graph and is blank for a device it does not contain.
    pub async fn get_device(&self, device_id: &DeviceId) -> Result<Device, CoreError> {
        debug!("fetching device {device_id}");
        let record = self.inner.api.get_device(device_id).await?;
        let (system_id, system_name) = self
            .systems_snapshot()
            .iter()
            .find(|s| s.device(device_id).is_some())
            .map_or_else(
                || (SystemId::from(""), String::new()),
                |s| (s.id().clone(), s.name().to_owned()),
            );
        Ok(Device::new(record, system_id, system_name))
    }

    pub async fn get_firmware_info(&self, device_id: &DeviceId) -> Result<FirmwareInfo, CoreError> {
        debug!("fetching firmware info for device {device_id}");
        let record = self.inner.api.get_firmware_info(device_id).await?;
        Ok(FirmwareInfo::new(record))
    }

    pub async fn get_zones(&self, device_id: &DeviceId) -> Result<Vec<Zone>, CoreError> {
        debug!("fetching zones for device {device_id}");
        let records = self.inner.api.get_zones(device_id).await?;
        Ok(records.into_iter().map(Zone::new).collect())
    }

    /// Fetch parameters per the configured filters, merged and deduplicated
    /// by `(parameterId, parameterName)` in first-seen order.
    pub async fn get_parameters(
        &self,
        device_id: &DeviceId,
        premium_manage: bool,
    ) -> Result<ParameterFetch, CoreError> {
        debug!("fetching parameters for device {device_id}");
        let config = &self.inner.config;

        let mut rows = Vec::new();
        for filter in config.parameter_filters() {
            rows.extend(self.inner.api.get_points(device_id, &filter).await?);
        }

        let (rows, duplicates) = dedup_parameters(rows);
        if duplicates > 0 {
            debug!("device {device_id}: dropped {duplicates} duplicate parameter row(s)");
        }

        let parameters = rows
            .into_iter()
            .map(|row| Parameter::new(row, device_id.clone(), config, premium_manage))
            .collect();
        Ok(ParameterFetch {
            parameters,
            duplicates,
        })
    }

    /// Raw write. `true` iff the API answered HTTP 200. The in-memory
    /// graph is not touched; the new value shows up after the next refresh.
    pub async fn patch_parameter(
        &self,
        device_id: &DeviceId,
        parameter_id: ParameterId,
        value: &str,
    ) -> Result<bool, CoreError> {
        Ok(self
            .inner
            .api
            .patch_point(device_id, parameter_id, value)
            .await?)
    }

    /// Checked write against the published graph.
    ///
    /// Fails with [`CoreError::ReadOnly`] unless the parameter is writable
    /// and its system has a `manage` subscription or write-without-
    /// subscription is enabled.
    pub async fn update_parameter(
        &self,
        device_id: &DeviceId,
        parameter_id: ParameterId,
        value: &str,
    ) -> Result<bool, CoreError> {
        let (system, device) = self.find_device(device_id)?;
        let parameter = device
            .parameter(parameter_id)
            .ok_or_else(|| CoreError::ParameterNotFound {
                device: device_id.to_string(),
                parameter: parameter_id.get(),
            })?;

        let entitled = system.premium_manage() || self.inner.config.writable_without_subscription;
        if !(parameter.is_writable() && entitled) {
            return Err(CoreError::ReadOnly {
                device: device_id.to_string(),
                parameter: parameter_id.get(),
            });
        }

        self.patch_parameter(device_id, parameter_id, value).await
    }
}
