// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod allocation;
pub mod analyze;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod scenario;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::allocation::{allocate, AllocationBreakdown, RiskProfile};
pub use crate::api::{router, AppState};
pub use crate::client::{AnalysisClient, BackendStatus};
pub use crate::config::AnalysisConfig;
pub use crate::error::{AnalysisError, InputError};
pub use crate::scenario::{Scenario, ScenarioAnalysis, ScenarioInput};
pub use crate::store::ScenarioStore;

use axum::Router;
use tracing::info;

/// Full application router: API routes, plus `/metrics` when a recorder is installed.
pub fn app(cfg: &AnalysisConfig, metrics: Option<&crate::metrics::Metrics>) -> Router {
    let client = AnalysisClient::from_config(cfg);
    info!(
        transport = client.transport_name(),
        api_base = %cfg.api_base,
        "analysis client ready"
    );
    let router = api::router(AppState::new(client));
    match metrics {
        Some(m) => router.merge(m.router()),
        None => router,
    }
}
