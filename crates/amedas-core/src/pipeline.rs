//! Collaborator seams and the resolve → encode → fetch → extract chain

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::codec::{encode, ProviderKey};
use crate::extract::extract;
use crate::types::StationObservation;
use crate::{FetchError, FetchResult, ResolveError, ResolveResult, Snapshot};

/// Supplies the most recent instant the provider has published data for
#[async_trait::async_trait]
pub trait LatestObservationResolver: Send + Sync {
    async fn latest(&self) -> ResolveResult<DateTime<FixedOffset>>;
}

/// Fetches the snapshot addressed by a provider key
#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, key: &ProviderKey) -> FetchResult<Snapshot>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result of one fetch chain for a single station
#[derive(Debug, Clone, PartialEq)]
pub struct StationLookup {
    pub observed_at: DateTime<FixedOffset>,
    /// `None` when the snapshot has no entry for the station
    pub observation: Option<StationObservation>,
}

/// Run the full chain for one station. The snapshot is dropped on return.
pub async fn observe_station<R, S>(
    resolver: &R,
    source: &S,
    station_code: &str,
) -> Result<StationLookup, PipelineError>
where
    R: LatestObservationResolver + ?Sized,
    S: SnapshotSource + ?Sized,
{
    let observed_at = resolver.latest().await?;
    let key = encode(&observed_at);
    tracing::debug!(%key, station = station_code, "fetching snapshot");

    let snapshot = source.fetch(&key).await?;
    let observation = extract(&snapshot, station_code).cloned();
    if observation.is_none() {
        tracing::info!(%key, station = station_code, stations = snapshot.len(), "station not in snapshot");
    }

    Ok(StationLookup {
        observed_at,
        observation,
    })
}
