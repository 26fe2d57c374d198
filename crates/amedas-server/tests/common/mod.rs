//! Shared fixtures: an in-process stand-in for the JMA provider

#![allow(dead_code)]

use std::net::SocketAddr;

use amedas_config::{AppConfig, ProviderConfig};
use amedas_core::AirportCatalog;
use amedas_server::Upstream;
use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const LATEST: &str = "2025-07-06T15:20:00+09:00";

pub const SNAPSHOT: &str = r#"{
    "44166": {"temp": [28.4, 0], "wind": [6.2, 0], "windDirection": [200, 0]},
    "91197": {"wind": [1.5, 0], "windDirection": [0, 0]},
    "82182": {"wind": [null, 5], "windDirection": [90, 0]}
}"#;

pub const AIRPORTS: &str = r#"[
    {"id": "haneda", "displayName": "Tokyo Haneda", "localizedName": "羽田空港",
     "iataCode": "HND", "icaoCode": "RJTT", "stationCode": "44166",
     "coordinates": {"lat": 35.5494, "lon": 139.7798}, "prefecture": "東京都"},
    {"id": "naha", "displayName": "Naha", "localizedName": "那覇空港",
     "iataCode": "OKA", "icaoCode": "ROAH", "stationCode": "91197",
     "coordinates": {"lat": 26.1958, "lon": 127.6459}, "prefecture": "沖縄県"},
    {"id": "fukuoka", "displayName": "Fukuoka", "localizedName": "福岡空港",
     "iataCode": "FUK", "icaoCode": "RJFF", "stationCode": "82182",
     "coordinates": {"lat": 33.5859, "lon": 130.4510}, "prefecture": "福岡県"},
    {"id": "nowhere", "displayName": "Nowhere", "localizedName": "架空空港",
     "iataCode": "XXX", "icaoCode": "RJXX", "stationCode": "00000",
     "coordinates": {"lat": 35.0, "lon": 135.0}}
]"#;

/// How the stub answers the latest-time marker
#[derive(Clone, Copy)]
pub enum Latest {
    At(&'static str),
    Down,
}

async fn map_file(Path(file): Path<String>) -> impl IntoResponse {
    match file.as_str() {
        "20250706152000.json" => (StatusCode::OK, SNAPSHOT.to_string()),
        "20250706153000.json" => (StatusCode::OK, String::new()),
        "20250706154000.json" => (StatusCode::OK, "{\"44166\": [".to_string()),
        _ => (StatusCode::NOT_FOUND, "Not Found".to_string()),
    }
}

pub async fn spawn_provider(latest: Latest) -> SocketAddr {
    let app = Router::new()
        .route("/bosai/amedas/data/map/:file", get(map_file))
        .route(
            "/bosai/amedas/data/latest_time.txt",
            get(move || async move {
                match latest {
                    Latest::At(t) => (StatusCode::OK, t).into_response(),
                    Latest::Down => StatusCode::SERVICE_UNAVAILABLE.into_response(),
                }
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn config_for(addr: SocketAddr) -> AppConfig {
    AppConfig {
        provider: Some(ProviderConfig {
            base_url: Some(format!("http://{addr}")),
            timeout_secs: Some(5),
        }),
        ..AppConfig::default()
    }
}

/// Router wired to a fresh stub provider
pub async fn app_with_provider(latest: Latest) -> Router {
    let addr = spawn_provider(latest).await;
    let upstream = Upstream::from_config(&config_for(addr)).unwrap();
    let (app, _state) = amedas_server::build_app(upstream, AirportCatalog::from_json_str(AIRPORTS).unwrap());
    app
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, value)
}
