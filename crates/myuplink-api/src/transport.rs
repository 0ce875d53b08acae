// Shared transport configuration for building the reqwest::Client and
// resolving the versioned API root.

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Production API host.
pub const API_HOST: &str = "https://api.myuplink.com";

/// API version segment prepended to every resource path.
pub const API_VERSION: &str = "v2";

/// Minimum spacing between two consecutive requests.
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(5);

/// Shared transport configuration for the API client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Host the versioned API lives under. Overridden in tests.
    pub base_url: Url,
    pub timeout: Duration,
    pub throttle_delay: Duration,
    /// `Accept-Language` sent with localized reads (e.g. `"en-GB"`).
    pub language: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(API_HOST).unwrap_or_else(|_| unreachable!("API_HOST is a valid URL")),
            timeout: Duration::from_secs(30),
            throttle_delay: DEFAULT_THROTTLE_DELAY,
            language: None,
        }
    }
}

impl TransportConfig {
    /// Config pointing at a different host, everything else default.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Self::default()
        })
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("myuplink-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }

    /// `{base_url}/{API_VERSION}/`, ready for joining relative paths.
    pub fn api_root(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{API_VERSION}/"))?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_root_appends_version_once() {
        let cfg = TransportConfig::with_base_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(cfg.api_root().unwrap().as_str(), "http://127.0.0.1:8080/v2/");
    }

    #[test]
    fn default_points_at_production() {
        let cfg = TransportConfig::default();
        assert_eq!(
            cfg.api_root().unwrap().as_str(),
            "https://api.myuplink.com/v2/"
        );
        assert_eq!(cfg.throttle_delay, Duration::from_secs(5));
    }
}
