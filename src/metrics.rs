use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Milliseconds; the service call is dominated by LLM latency.
const DURATION_BUCKETS_MS: &[f64] = &[
    5.0, 25.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0, 30_000.0, 60_000.0,
];

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. The recorder is process-global, so a
    /// second call returns the handle from the first.
    pub fn install() -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| -> anyhow::Result<PrometheusHandle> {
                let handle = PrometheusBuilder::new()
                    .set_buckets_for_metric(
                        Matcher::Full("scenario_analysis_duration_ms".to_string()),
                        DURATION_BUCKETS_MS,
                    )?
                    .install_recorder()?;
                describe();
                Ok(handle)
            })?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(
        "scenario_analysis_total",
        "Scenarios analyzed, labelled by source (remote|fallback)."
    );
    describe_counter!(
        "scenario_analysis_fallback_total",
        "Fallback analyses, labelled by cause."
    );
    describe_histogram!(
        "scenario_analysis_duration_ms",
        "Time spent obtaining an analysis, fallback included."
    );
    describe_counter!(
        "allocation_requests_total",
        "Budget allocations computed, labelled by risk profile."
    );
}
