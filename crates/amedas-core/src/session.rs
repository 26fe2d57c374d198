//! Selection-driven wind view state
//!
//! Every selection starts a new fetch chain stamped with a generation
//! number. Completions carrying an older generation are dropped, so a slow
//! chain can never overwrite the result of a newer selection.
//!
//! ```text
//! Idle ──select──▶ Loading ──ok──▶ Ready
//!                     │  ├──no station / unusable wind──▶ NoData
//!                     │  └──err──▶ Error
//!  (any state) ──select──▶ Loading
//! ```

use chrono::{DateTime, FixedOffset};
use tokio::sync::Mutex;

use crate::airports::Airport;
use crate::pipeline::{
    observe_station, LatestObservationResolver, PipelineError, SnapshotSource, StationLookup,
};
use crate::types::{StationObservation, WindReading};
use crate::wind::{present, WindPresentation};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Ready(WindPresentation),
    Error(String),
    NoData,
}

/// Handle for one in-flight chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    station_code: String,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn station_code(&self) -> &str {
        &self.station_code
    }
}

#[derive(Debug, Default)]
pub struct WindSession {
    state: ViewState,
    generation: u64,
    selected: Option<Airport>,
    observation: Option<StationObservation>,
    observed_at: Option<DateTime<FixedOffset>>,
}

impl WindSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading` for a new selection and hand out its ticket
    pub fn begin(&mut self, airport: &Airport) -> Ticket {
        self.generation += 1;
        self.selected = Some(airport.clone());
        self.state = ViewState::Loading;
        Ticket {
            generation: self.generation,
            station_code: airport.station_code.clone(),
        }
    }

    /// Apply a chain's result. Returns `false` if the ticket was superseded.
    pub fn finish(&mut self, ticket: &Ticket, result: Result<StationLookup, PipelineError>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded fetch result"
            );
            return false;
        }

        self.state = match result {
            Ok(lookup) => {
                self.observed_at = Some(lookup.observed_at);
                let reading = lookup.observation.as_ref().and_then(StationObservation::wind_reading);
                self.observation = lookup.observation;
                match reading {
                    Some(r) => ViewState::Ready(present(r.speed, r.bearing)),
                    None => ViewState::NoData,
                }
            }
            // last good observation is kept on error
            Err(e) => ViewState::Error(e.to_string()),
        };
        true
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> Option<&Airport> {
        self.selected.as_ref()
    }

    pub fn observation(&self) -> Option<&StationObservation> {
        self.observation.as_ref()
    }

    pub fn reading(&self) -> Option<WindReading> {
        self.observation.as_ref().and_then(StationObservation::wind_reading)
    }

    pub fn observed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.observed_at
    }

    /// Soft message for the `NoData` state
    pub fn no_data_message(&self) -> Option<String> {
        match (&self.state, &self.selected) {
            (ViewState::NoData, Some(a)) => Some(a.no_data_message()),
            _ => None,
        }
    }
}

/// Outcome of one `select` call
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied(ViewState),
    Superseded,
}

/// Drives fetch chains against a shared session
pub struct Orchestrator<R, S> {
    resolver: R,
    source: S,
    session: Mutex<WindSession>,
}

impl<R, S> Orchestrator<R, S>
where
    R: LatestObservationResolver,
    S: SnapshotSource,
{
    pub fn new(resolver: R, source: S) -> Self {
        Self {
            resolver,
            source,
            session: Mutex::new(WindSession::new()),
        }
    }

    /// Select an airport and run its chain to completion
    pub async fn select(&self, airport: &Airport) -> Completion {
        let ticket = self.session.lock().await.begin(airport);
        tracing::info!(airport = %airport.id, generation = ticket.generation, "loading wind");

        let result = observe_station(&self.resolver, &self.source, ticket.station_code()).await;
        if let Err(e) = &result {
            tracing::warn!(airport = %airport.id, error = %e, "wind fetch failed");
        }

        let mut session = self.session.lock().await;
        if session.finish(&ticket, result) {
            Completion::Applied(session.state().clone())
        } else {
            Completion::Superseded
        }
    }

    pub async fn state(&self) -> ViewState {
        self.session.lock().await.state().clone()
    }

    pub async fn reading(&self) -> Option<WindReading> {
        self.session.lock().await.reading()
    }

    pub async fn no_data_message(&self) -> Option<String> {
        self.session.lock().await.no_data_message()
    }
}
