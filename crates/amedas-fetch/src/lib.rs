//! HTTP adapters for the JMA AMeDAS provider
//!
//! [`SnapshotFetcher`] downloads one map snapshot per request and
//! [`LatestTimeResolver`] reads the provider's latest publication time.
//! Both make a single attempt and report failures as tagged results.

pub mod fetcher;
pub mod latest;

pub use fetcher::*;
pub use latest::*;

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Public JMA host
pub const DEFAULT_BASE_URL: &str = "https://www.jma.go.jp";

const MAP_PATH: &str = "bosai/amedas/data/map/";
const LATEST_TIME_PATH: &str = "bosai/amedas/data/latest_time.txt";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Resolved provider URLs
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    base: Url,
}

impl ProviderEndpoints {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // a trailing slash keeps `join` from dropping the last path segment
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `<base>/bosai/amedas/data/map/<key>.json`
    pub fn snapshot_url(&self, key: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("{MAP_PATH}{key}.json"))
    }

    pub fn latest_time_url(&self) -> Result<Url, url::ParseError> {
        self.base.join(LATEST_TIME_PATH)
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            base: Url::parse(&format!("{DEFAULT_BASE_URL}/")).expect("default base URL is valid"),
        }
    }
}

/// Shared reqwest client with an overall request timeout
pub fn build_client(timeout: Option<Duration>) -> Result<Client, ClientError> {
    let mut builder = Client::builder().user_agent(concat!("amedas-wind/", env!("CARGO_PKG_VERSION")));
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_url() {
        let endpoints = ProviderEndpoints::default();
        assert_eq!(
            endpoints.snapshot_url("20250706152000").unwrap().as_str(),
            "https://www.jma.go.jp/bosai/amedas/data/map/20250706152000.json"
        );
        assert_eq!(
            endpoints.latest_time_url().unwrap().as_str(),
            "https://www.jma.go.jp/bosai/amedas/data/latest_time.txt"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let endpoints = ProviderEndpoints::new("http://127.0.0.1:9000/mirror").unwrap();
        assert_eq!(
            endpoints.snapshot_url("20250706152000").unwrap().as_str(),
            "http://127.0.0.1:9000/mirror/bosai/amedas/data/map/20250706152000.json"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            ProviderEndpoints::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}
