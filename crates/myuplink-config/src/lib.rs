//! Shared configuration for myUplink tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `myuplink_core::ClientOptions` and
//! `myuplink_api::TransportConfig`. The CLI layers its flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use myuplink_api::TransportConfig;
use myuplink_core::{ClientConfig, ClientOptions};

/// Keyring service name; entries are keyed `<profile>/access-token`.
pub const KEYRING_SERVICE: &str = "myuplink";

pub const DEFAULT_SCAN_INTERVAL: u64 = 300;
pub const MIN_SCAN_INTERVAL: u64 = 5;
pub const MAX_SCAN_INTERVAL: u64 = 600;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named myUplink account profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API host override (defaults to `https://api.myuplink.com`).
    pub base_url: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// `Accept-Language` for localized names and texts, e.g. "en-GB".
    pub language: Option<String>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Seconds between polls for long-running consumers.
    pub scan_interval: Option<u64>,

    /// Minimum seconds between two API requests.
    pub throttle_delay: Option<u64>,

    pub fetch_firmware: Option<bool>,
    pub fetch_notifications: Option<bool>,
    pub enable_smart_home_mode: Option<bool>,
    pub fetch_zones: Option<bool>,
    pub writable_without_subscription: Option<bool>,

    /// JSON object, parameter id -> platform.
    pub platform_override: Option<String>,
    /// JSON object, parameter id -> bool.
    pub writable_override: Option<String>,
    /// JSON array of parameter ids.
    pub parameter_whitelist: Option<String>,
    /// JSON array of parameter ids.
    pub additional_parameter: Option<String>,
}

impl Profile {
    /// Poll interval, bounded to 5..=600 seconds.
    pub fn scan_interval(&self) -> Result<Duration, ConfigError> {
        let secs = self.scan_interval.unwrap_or(DEFAULT_SCAN_INTERVAL);
        if !(MIN_SCAN_INTERVAL..=MAX_SCAN_INTERVAL).contains(&secs) {
            return Err(ConfigError::Validation {
                field: "scan_interval".into(),
                reason: format!(
                    "{secs}s is outside {MIN_SCAN_INTERVAL}..={MAX_SCAN_INTERVAL} seconds"
                ),
            });
        }
        Ok(Duration::from_secs(secs))
    }

    /// String-typed client options; parsing happens in `ClientConfig`.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            platform_override: self.platform_override.clone(),
            writable_override: self.writable_override.clone(),
            parameter_whitelist: self.parameter_whitelist.clone(),
            additional_parameter: self.additional_parameter.clone(),
            fetch_firmware: self.fetch_firmware,
            fetch_notifications: self.fetch_notifications,
            enable_smart_home_mode: self.enable_smart_home_mode,
            fetch_zones: self.fetch_zones,
            writable_without_subscription: self.writable_without_subscription,
            language: self.language.clone(),
            throttle_delay_secs: self.throttle_delay,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "myuplink", "myuplink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("myuplink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// `MYUPLINK_` variables override the file; nested keys use `__`
/// (`MYUPLINK_PROFILES__HOME__LANGUAGE=sv-SE`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MYUPLINK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick `requested`, else the configured default, else `"default"`.
pub fn select_profile<'a>(
    cfg: &'a Config,
    requested: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = requested
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    cfg.profiles
        .get(&name)
        .map(|profile| (name.clone(), profile))
        .ok_or(ConfigError::UnknownProfile { profile: name })
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/access-token"))
}

/// Resolve an access token from the credential chain.
pub fn resolve_access_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's access_token_env → env var lookup
    if let Some(env_name) = &profile.access_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(token) = &profile.access_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an access token in the system keyring for `profile_name`.
pub fn store_access_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the transport settings from a profile (no CLI overrides).
///
/// Rejects a profile whose `scan_interval` is out of bounds.
pub fn profile_to_transport(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<TransportConfig, ConfigError> {
    profile.scan_interval()?;
    let mut transport = match &profile.base_url {
        Some(raw) => {
            TransportConfig::with_base_url(raw).map_err(|_| ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("invalid URL: {raw}"),
            })?
        }
        None => TransportConfig::default(),
    };
    transport.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    ClientConfig::from(&profile.client_options()).apply_to(&mut transport);
    Ok(transport)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn profiles_parse_from_toml() {
        let (_dir, path) = write_config(
            r#"
default_profile = "home"

[profiles.home]
access_token = "secret"
language = "sv-SE"
scan_interval = 60
fetch_zones = true
platform_override = '{"40004": "number"}'
"#,
        );
        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = select_profile(&cfg, None).unwrap();
        assert_eq!(name, "home");
        assert_eq!(profile.scan_interval().unwrap(), Duration::from_secs(60));

        let options = profile.client_options();
        assert_eq!(options.fetch_zones, Some(true));
        assert_eq!(options.platform_override.as_deref(), Some(r#"{"40004": "number"}"#));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        let err = select_profile(&cfg, Some("cabin")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { profile } if profile == "cabin"));
    }

    #[test]
    fn scan_interval_bounds() {
        let mut profile = Profile::default();
        assert_eq!(profile.scan_interval().unwrap(), Duration::from_secs(300));

        profile.scan_interval = Some(5);
        assert!(profile.scan_interval().is_ok());
        profile.scan_interval = Some(600);
        assert!(profile.scan_interval().is_ok());

        profile.scan_interval = Some(4);
        assert!(matches!(
            profile.scan_interval(),
            Err(ConfigError::Validation { field, .. }) if field == "scan_interval"
        ));
        profile.scan_interval = Some(601);
        assert!(profile.scan_interval().is_err());
    }

    #[test]
    fn transport_from_profile() {
        let profile = Profile {
            base_url: Some("http://localhost:9000".into()),
            timeout: Some(5),
            language: Some("en-GB".into()),
            throttle_delay: Some(2),
            ..Profile::default()
        };
        let transport = profile_to_transport(&profile, &Defaults::default()).unwrap();
        assert_eq!(transport.api_root().unwrap().as_str(), "http://localhost:9000/v2/");
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.throttle_delay, Duration::from_secs(2));
        assert_eq!(transport.language.as_deref(), Some("en-GB"));
    }

    #[test]
    fn invalid_base_url_is_validation_error() {
        let profile = Profile {
            base_url: Some("not a url".into()),
            ..Profile::default()
        };
        let err = profile_to_transport(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "base_url"));
    }

    #[test]
    fn out_of_range_scan_interval_rejects_profile() {
        let (_dir, path) = write_config(
            r#"
[profiles.default]
scan_interval = 1
"#,
        );
        let cfg = load_config_from(&path).unwrap();
        let (_, profile) = select_profile(&cfg, None).unwrap();
        let err = profile_to_transport(profile, &cfg.defaults).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "scan_interval"));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                access_token_env: Some("MY_TOKEN".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].access_token_env.as_deref(),
            Some("MY_TOKEN")
        );
    }
}
