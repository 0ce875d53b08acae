// ── Core error types ──
//
// User-facing errors from myuplink-core. The `From<myuplink_api::Error>`
// impl translates transport-layer errors into domain variants; consumers
// never match on reqwest or serde failures directly.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach myUplink at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("System not found: {identifier}")]
    SystemNotFound { identifier: String },

    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Parameter {parameter} not found on device {device}")]
    ParameterNotFound { device: String, parameter: i64 },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Parameter {parameter} on device {device} is read-only")]
    ReadOnly { device: String, parameter: i64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for variants that mean "look it up again".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SystemNotFound { .. } | Self::DeviceNotFound { .. } | Self::ParameterNotFound { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<myuplink_api::Error> for CoreError {
    fn from(err: myuplink_api::Error) -> Self {
        match err {
            myuplink_api::Error::Authentication { status, message } => {
                CoreError::AuthenticationFailed {
                    message: format!("HTTP {status}: {message}"),
                }
            }
            myuplink_api::Error::Token { message } => CoreError::AuthenticationFailed { message },
            myuplink_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::Api {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "<unknown>".into()),
                    reason: e.to_string(),
                },
            },
            myuplink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            myuplink_api::Error::InvalidHeader(e) => CoreError::Config {
                message: format!("Invalid header value: {e}"),
            },
            myuplink_api::Error::Http { status, message } => CoreError::Api { status, message },
            myuplink_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
