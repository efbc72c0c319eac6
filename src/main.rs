//! Scenario Planner: Binary Entrypoint
//! Boots the Axum HTTP server with the analysis client, scenario store and
//! allocation endpoints wired in.

use scenario_planner::{app, config::AnalysisConfig, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Structured logs: `RUST_LOG` filter, `LOG_FORMAT=json` for machine output.
/// `try_init` leaves an already installed subscriber (e.g. the runtime's) in place.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scenario_planner=info,warn"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

fn metrics_enabled() -> bool {
    std::env::var("METRICS_ENABLED")
        .map(|v| !matches!(v.trim(), "0" | "false" | "off"))
        .unwrap_or(true)
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AnalysisConfig::load_default().unwrap_or_else(|e| {
        warn!(error = ?e, "analysis config unusable; using defaults");
        AnalysisConfig::default()
    });

    let metrics = if metrics_enabled() {
        match Metrics::install() {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(error = ?e, "metrics recorder not installed");
                None
            }
        }
    } else {
        None
    };

    let router = app(&cfg, metrics.as_ref());
    Ok(router.into())
}
