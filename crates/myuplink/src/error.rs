//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use myuplink_config::ConfigError;
use myuplink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the myUplink API at {url}")]
    #[diagnostic(
        code(myuplink::connection_failed),
        help(
            "Check your network connection and the configured base_url.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(myuplink::auth_failed),
        help(
            "The access token was rejected or has expired.\n\
             Store a fresh one with: myuplink config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(myuplink::no_credentials),
        help(
            "Configure one with: myuplink config init\n\
             Or pass --token / set MYUPLINK_ACCESS_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(myuplink::not_found),
        help("Run: myuplink {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Parameter {parameter} on device {device} is read-only")]
    #[diagnostic(
        code(myuplink::read_only),
        help(
            "Writing needs a writable parameter and a 'manage' subscription,\n\
             or writable_without_subscription = true in your profile.\n\
             Use --force to send the write regardless."
        )
    )]
    ReadOnly { device: String, parameter: i64 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(myuplink::api_error))]
    ApiError { status: u16, message: String },

    #[error("The API did not accept {action}")]
    #[diagnostic(
        code(myuplink::rejected),
        help("The request went through but was not confirmed; check the value and retry.")
    )]
    Rejected { action: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(myuplink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(myuplink::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: myuplink config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(myuplink::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(myuplink::keyring))]
    Keyring(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(myuplink::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(myuplink::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::ReadOnly { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::SystemNotFound { identifier } => CliError::NotFound {
                resource_type: "system".into(),
                identifier,
                list_command: "systems list".into(),
            },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::ParameterNotFound { device, parameter } => CliError::NotFound {
                resource_type: "parameter".into(),
                identifier: parameter.to_string(),
                list_command: format!("parameters {device}"),
            },

            CoreError::ReadOnly { device, parameter } => CliError::ReadOnly { device, parameter },

            CoreError::Api { status, message } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Serialization(e) => CliError::Internal(format!("failed to write config: {e}")),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let auth = CliError::from(CoreError::AuthenticationFailed {
            message: "HTTP 401".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing = CliError::from(CoreError::DeviceNotFound {
            identifier: "dev".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let read_only = CliError::from(CoreError::ReadOnly {
            device: "dev".into(),
            parameter: 47011,
        });
        assert_eq!(read_only.exit_code(), exit_code::PERMISSION);

        let offline = CliError::from(CoreError::ConnectionFailed {
            url: "https://api.myuplink.com".into(),
            reason: "dns".into(),
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let api = CliError::from(CoreError::Api {
            status: 503,
            message: "busy".into(),
        });
        assert_eq!(api.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "home".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(err.to_string().contains("home"));
    }
}
