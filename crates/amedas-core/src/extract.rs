//! Station lookup inside a snapshot

use crate::types::{Snapshot, StationObservation};

/// Look up one station. A missing code means "no observation", not a failure.
pub fn extract<'a>(snapshot: &'a Snapshot, station_code: &str) -> Option<&'a StationObservation> {
    snapshot.station(station_code)
}
