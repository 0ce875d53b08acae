// myuplink-core: typed domain graph between myuplink-api and consumers.

pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::Platform;
pub use config::{ClientConfig, ClientOptions};
pub use controller::{Controller, ParameterFetch};
pub use error::CoreError;
pub use model::{Device, FirmwareInfo, Notification, Parameter, System, Zone};

// Identifiers and enums shared with the wire layer.
pub use myuplink_api::{DeviceId, ParameterId, SmartHomeMode, SystemId, ZoneId};
