// myuplink-api: async client for the myUplink cloud REST API (v2).
//
// Transport, bearer-token plumbing, request throttling and the raw wire
// types. The typed domain graph lives in `myuplink-core`.

pub mod auth;
pub mod client;
pub mod error;
pub mod ids;
pub mod models;
pub mod throttle;
pub mod transport;

pub use auth::{StaticToken, TokenProvider};
pub use client::{ApiClient, JSON_PATCH, RequestOptions};
pub use error::Error;
pub use ids::{DeviceId, ParameterId, SystemId, ZoneId};
pub use models::SmartHomeMode;
pub use throttle::{Throttle, ThrottlePermit};
pub use transport::{API_HOST, API_VERSION, DEFAULT_THROTTLE_DELAY, TransportConfig};
