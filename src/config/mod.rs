use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::Policy;

/// Top-level configuration from `.keyaudit.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub policy: Policy,
}

/// Exchange endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST base URL of the exchange.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `recvWindow` attached to signed requests, in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Transport timeout for the fetch, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.binance.com".into()
}

fn default_recv_window_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recv_window_ms: default_recv_window_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# keyaudit configuration

[api]
# REST base URL of the exchange.
base_url = "https://api.binance.com"

# recvWindow for signed requests, in milliseconds.
recv_window_ms = 5000

# Transport timeout, in seconds.
timeout_secs = 10

[policy]
# Minimum aggregate risk level that fails the audit (low, medium, high).
fail_on = "high"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RiskLevel;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(".keyaudit.toml")).unwrap();
        assert_eq!(config.api.base_url, "https://api.binance.com");
        assert_eq!(config.policy.fail_on, RiskLevel::High);
    }

    #[test]
    fn starter_toml_parses_back() {
        let config: Config = toml::from_str(Config::starter_toml()).unwrap();
        assert_eq!(config.api.recv_window_ms, 5000);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.policy.fail_on, RiskLevel::High);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".keyaudit.toml");
        std::fs::write(&path, "[policy]\nfail_on = \"medium\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.policy.fail_on, RiskLevel::Medium);
        assert_eq!(config.api.base_url, "https://api.binance.com");
    }
}
