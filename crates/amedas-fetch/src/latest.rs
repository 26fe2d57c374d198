//! Latest publication time from `latest_time.txt`

use amedas_core::{LatestObservationResolver, ResolveError, ResolveResult};
use chrono::{DateTime, FixedOffset};
use reqwest::Client;

use crate::ProviderEndpoints;

/// Reads the provider's latest-time marker once per call
#[derive(Debug, Clone)]
pub struct LatestTimeResolver {
    client: Client,
    endpoints: ProviderEndpoints,
}

impl LatestTimeResolver {
    pub fn new(client: Client, endpoints: ProviderEndpoints) -> Self {
        Self { client, endpoints }
    }
}

/// Parse the marker body, e.g. `2025-07-06T15:20:00+09:00\n`
pub fn parse_latest_time(body: &str) -> ResolveResult<DateTime<FixedOffset>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::Unparseable("empty latest time".into()));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map_err(|e| ResolveError::Unparseable(format!("'{}': {}", trimmed.chars().take(64).collect::<String>(), e)))
}

#[async_trait::async_trait]
impl LatestObservationResolver for LatestTimeResolver {
    async fn latest(&self) -> ResolveResult<DateTime<FixedOffset>> {
        let url = self
            .endpoints
            .latest_time_url()
            .map_err(|e| ResolveError::Request(e.to_string()))?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "latest time request failed");
            return Err(ResolveError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ResolveError::Request(e.to_string()))?;
        let latest = parse_latest_time(&body)?;
        tracing::debug!(%latest, "resolved latest observation time");
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest_time() {
        let t = parse_latest_time("2025-07-06T15:20:00+09:00\n").unwrap();
        assert_eq!(t.to_rfc3339(), "2025-07-06T15:20:00+09:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_latest_time("   "),
            Err(ResolveError::Unparseable(_))
        ));
        assert!(matches!(
            parse_latest_time("<html>maintenance</html>"),
            Err(ResolveError::Unparseable(_))
        ));
    }
}
