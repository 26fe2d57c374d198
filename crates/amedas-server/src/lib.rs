use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use amedas_config::AppConfig;
use amedas_core::{
    encode_str, observe_station, Airport, AirportCatalog, FetchError, LatestObservationResolver,
    PipelineError, Region, SnapshotSource, WindPresentation, WindReading,
};
use amedas_fetch::{build_client, LatestTimeResolver, ProviderEndpoints, SnapshotFetcher};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

/// Upstream collaborators shared by every request
#[derive(Clone)]
pub struct Upstream {
    pub resolver: Arc<dyn LatestObservationResolver>,
    pub source: Arc<dyn SnapshotSource>,
}

impl Upstream {
    /// JMA-backed resolver and fetcher sharing one HTTP client
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let endpoints = ProviderEndpoints::new(&cfg.provider_base_url())
            .context("invalid provider base URL")?;
        let client = build_client(cfg.provider_timeout()).context("failed to build HTTP client")?;
        Ok(Self {
            resolver: Arc::new(LatestTimeResolver::new(client.clone(), endpoints.clone())),
            source: Arc::new(SnapshotFetcher::new(client, endpoints)),
        })
    }
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    upstream_failures_total: Counter<u64>,
    upstream: Upstream,
    airports: AirportCatalog,
}

impl AppState {
    fn record_failure(&self, kind: &'static str) {
        self.upstream_failures_total
            .add(1, &[KeyValue::new("kind", kind)]);
    }
}

pub fn build_app(upstream: Upstream, airports: AirportCatalog) -> (Router, Arc<AppState>) {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .expect("prom exporter");
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("amedas-wind");

    let requests_total = meter
        .u64_counter("amedas_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let upstream_failures_total = meter
        .u64_counter("amedas_upstream_failures_total")
        .with_description("Failed calls to the AMeDAS provider, by kind")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        upstream_failures_total,
        upstream,
        airports,
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/weather", get(latest_time))
        .route("/weather/amedas/:timestamp", get(amedas_snapshot))
        .route("/airports", get(list_airports))
        .route("/airports/default", get(default_airport))
        .route("/airports/:id/wind", get(airport_wind))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    (router, state)
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

/// `{latestTime}` from the provider, or `{error}` with 500
async fn latest_time(State(state): State<Arc<AppState>>) -> Response {
    state.requests_total.add(1, &[]);
    match state.upstream.resolver.latest().await {
        Ok(t) => (StatusCode::OK, Json(json!({ "latestTime": t.to_rfc3339() }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "latest time lookup failed");
            state.record_failure("resolver");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Raw provider snapshot for one timestamp
async fn amedas_snapshot(
    State(state): State<Arc<AppState>>,
    Path(timestamp): Path<String>,
) -> Response {
    state.requests_total.add(1, &[]);
    let key = match encode_str(&timestamp) {
        Ok(k) => k,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid timestamp", "details": e.to_string() })),
            )
                .into_response()
        }
    };

    match state.upstream.source.fetch(&key).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            tracing::error!(%key, error = %e, "Error fetching AMeDAS data");
            fetch_failure(&state, &e)
        }
    }
}

fn fetch_failure(state: &AppState, e: &FetchError) -> Response {
    state.record_failure(e.kind());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to fetch AMeDAS data", "details": e.to_string() })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct AirportsQuery {
    group: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegionListing<'a> {
    region: Region,
    label: &'static str,
    airports: Vec<AirportEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AirportEntry<'a> {
    #[serde(flatten)]
    airport: &'a Airport,
    option_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupedAirports<'a> {
    default_airport: Option<&'a str>,
    regions: Vec<RegionListing<'a>>,
}

/// Flat catalog, or `?group=region` for the picker layout
async fn list_airports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AirportsQuery>,
) -> Response {
    state.requests_total.add(1, &[]);
    match query.group.as_deref() {
        None => Json(state.airports.all()).into_response(),
        Some("region") => {
            let regions = state
                .airports
                .by_region()
                .into_iter()
                .map(|g| RegionListing {
                    region: g.region,
                    label: g.region.label(),
                    airports: g
                        .airports
                        .into_iter()
                        .map(|airport| AirportEntry {
                            airport,
                            option_label: airport.option_label(),
                        })
                        .collect(),
                })
                .collect();
            let body = GroupedAirports {
                default_airport: state.airports.default_airport().map(|a| a.id.as_str()),
                regions,
            };
            Json(body).into_response()
        }
        Some(other) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unsupported grouping: {other}") })),
        )
            .into_response(),
    }
}

async fn default_airport(State(state): State<Arc<AppState>>) -> Response {
    state.requests_total.add(1, &[]);
    match state.airports.default_airport() {
        Some(airport) => Json(airport).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No default airport in catalog" })),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AirportWind {
    airport: String,
    station_code: String,
    observed_at: String,
    status: &'static str,
    #[serde(flatten)]
    reading: Option<WindReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presentation: Option<WindPresentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Full pipeline for one airport: resolve, fetch, extract, present
async fn airport_wind(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    state.requests_total.add(1, &[]);
    let Some(airport) = state.airports.find(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown airport: {id}") })),
        )
            .into_response();
    };

    let lookup = match observe_station(
        state.upstream.resolver.as_ref(),
        state.upstream.source.as_ref(),
        &airport.station_code,
    )
    .await
    {
        Ok(lookup) => lookup,
        Err(PipelineError::Fetch(e)) => {
            tracing::error!(airport = %airport.id, error = %e, "Error fetching AMeDAS data");
            return fetch_failure(&state, &e);
        }
        Err(PipelineError::Resolve(e)) => {
            tracing::error!(airport = %airport.id, error = %e, "latest time lookup failed");
            state.record_failure("resolver");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to resolve latest observation time", "details": e.to_string() })),
            )
                .into_response();
        }
    };

    let reading = lookup
        .observation
        .as_ref()
        .and_then(|obs| obs.wind_reading());
    let body = match reading {
        Some(r) => AirportWind {
            airport: airport.id.clone(),
            station_code: airport.station_code.clone(),
            observed_at: lookup.observed_at.to_rfc3339(),
            status: "ok",
            reading: Some(r),
            presentation: Some(amedas_core::present(r.speed, r.bearing)),
            message: None,
        },
        None => AirportWind {
            airport: airport.id.clone(),
            station_code: airport.station_code.clone(),
            observed_at: lookup.observed_at.to_rfc3339(),
            status: "noData",
            reading: None,
            presentation: None,
            message: Some(airport.no_data_message()),
        },
    };
    (StatusCode::OK, Json(body)).into_response()
}
