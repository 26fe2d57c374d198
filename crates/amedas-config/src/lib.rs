use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the TOML file to load
pub const CONFIG_ENV: &str = "AMEDAS_CONFIG";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_PROVIDER_URL: &str = "https://www.jma.go.jp";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_AIRPORTS_PATH: &str = "data/airports.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    /// Whole-request timeout; 0 disables it
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportsConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub provider: Option<ProviderConfig>,
    pub airports: Option<AirportsConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from the AMEDAS_CONFIG path (TOML) if present, with defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file yields the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// Provider base URL (default https://www.jma.go.jp)
    pub fn provider_base_url(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.base_url.clone())
            .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string())
    }

    /// Upstream request timeout (default 10s, `None` when set to 0)
    pub fn provider_timeout(&self) -> Option<Duration> {
        let secs = self
            .provider
            .as_ref()
            .and_then(|p| p.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Airport reference file (default data/airports.json)
    pub fn airports_path(&self) -> String {
        self.airports
            .as_ref()
            .and_then(|a| a.path.clone())
            .unwrap_or_else(|| DEFAULT_AIRPORTS_PATH.to_string())
    }
}
