//! Snapshot download and validation

use amedas_core::{FetchError, FetchResult, ProviderKey, Snapshot, SnapshotSource};
use reqwest::Client;

use crate::ProviderEndpoints;

/// Fetches one map snapshot per call. No retries, no caching.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    client: Client,
    endpoints: ProviderEndpoints,
}

impl SnapshotFetcher {
    pub fn new(client: Client, endpoints: ProviderEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }

    async fn fetch_snapshot(&self, key: &ProviderKey) -> FetchResult<Snapshot> {
        let url = self
            .endpoints
            .snapshot_url(key.as_str())
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        // the provider answers 200 with an empty body when nothing was published
        if text.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        serde_json::from_str::<Snapshot>(&text).map_err(|e| FetchError::malformed(&text, e.to_string()))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for SnapshotFetcher {
    async fn fetch(&self, key: &ProviderKey) -> FetchResult<Snapshot> {
        match self.fetch_snapshot(key).await {
            Ok(snapshot) => {
                tracing::debug!(%key, stations = snapshot.len(), "snapshot fetched");
                Ok(snapshot)
            }
            Err(e) => {
                match &e {
                    FetchError::MalformedPayload { raw_prefix, reason } => {
                        tracing::warn!(%key, %reason, raw_prefix = %raw_prefix, "unparseable snapshot")
                    }
                    other => tracing::warn!(%key, kind = other.kind(), error = %other, "snapshot fetch failed"),
                }
                Err(e)
            }
        }
    }
}
