use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_BASE_URL: &str = "https://api.bunny.net";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider settings. Deserializable from JSON such as
/// `{"access_key": "...", "timeout": 10}` with `timeout` in seconds. Unknown
/// keys such as `debug` are ignored; logging follows the tracing filter.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    pub access_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String, // e.g. "https://api.bunny.net"
    #[serde(default = "default_timeout", deserialize_with = "timeout_secs")]
    pub timeout: Duration,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn timeout_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    match u64::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("timeout must be at least 1 second")),
        secs => Ok(Duration::from_secs(secs)),
    }
}

impl ProviderConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// API root without trailing slash.
    pub fn base_url_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
