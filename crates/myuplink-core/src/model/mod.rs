// ── Domain model ──
//
// Typed views over API payloads. Ownership flows downward
// (System -> Device -> Parameter/Zone/Notification/FirmwareInfo); the
// upward links are plain ids.

mod device;
mod firmware;
mod notification;
mod parameter;
mod system;
mod zone;

pub use device::Device;
pub use firmware::FirmwareInfo;
pub use notification::Notification;
pub use parameter::{NO_VALUE_SENTINEL, Parameter, dedup_parameters};
pub use system::System;
pub use zone::Zone;
