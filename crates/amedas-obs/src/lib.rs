use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,amedas=debug,tower_http=info";

/// Initialize logging.
/// - JSON lines on stdout
/// - RUST_LOG respected; otherwise [`DEFAULT_FILTER`]
pub fn init(service_name: &str) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

    let result = tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();

    match result {
        Ok(()) => tracing::info!(service = %service_name, "Observability initialized"),
        Err(e) => eprintln!("tracing already initialized: {e}"),
    }
}
