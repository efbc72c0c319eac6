//! # Analysis Client
//! Turns a [`ScenarioInput`] into a [`Scenario`], calling the analysis service
//! when it can and falling back to a locally generated analysis when it cannot.
//!
//! `analyze` never fails. The reason for a fallback is reported on the log
//! channel and, for callers that care, through [`AnalysisOutcome`].
//!
//! There is no cancellation: dropping the future abandons the request, and a
//! future that is polled to completion always yields a scenario. Nothing here
//! deduplicates concurrent submissions of the same input.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{info, warn};

use crate::analyze::adapter::{build_transport, DynTransport, SimulateRequest};
use crate::analyze::fallback::{FallbackGenerator, RandomFallback};
use crate::analyze::mapper;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::scenario::{Scenario, ScenarioInput};

/// Result of [`AnalysisClient::analyze_reported`].
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub scenario: Scenario,
    /// Set when the scenario carries a fallback analysis.
    pub fallback_cause: Option<AnalysisError>,
}

/// What the UI shows about the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackendStatus {
    Connected { provider: String, model: Option<String> },
    /// Reachable, but answering from its own canned data.
    Mock,
    Disconnected { reason: String },
}

impl BackendStatus {
    pub fn message(&self) -> String {
        match self {
            BackendStatus::Connected { provider, model } => match model {
                Some(m) => format!("Connected to {provider} ({m})"),
                None => format!("Connected to {provider}"),
            },
            BackendStatus::Mock => "Using mock data - Backend not configured".to_string(),
            BackendStatus::Disconnected { .. } => {
                "Backend not reachable - Using mock data".to_string()
            }
        }
    }
}

/// Millisecond timestamps, bumped when two ids would collide within a process.
#[derive(Debug, Default)]
pub struct ScenarioIdGenerator {
    last: AtomicI64,
}

impl ScenarioIdGenerator {
    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1).to_string()
    }
}

pub struct AnalysisClient {
    transport: DynTransport,
    fallback: Arc<dyn FallbackGenerator>,
    ids: ScenarioIdGenerator,
}

impl AnalysisClient {
    pub fn new(transport: DynTransport, fallback: Arc<dyn FallbackGenerator>) -> Self {
        Self {
            transport,
            fallback,
            ids: ScenarioIdGenerator::default(),
        }
    }

    /// Transport from config, OS-seeded random fallback.
    pub fn from_config(cfg: &AnalysisConfig) -> Self {
        Self::new(build_transport(cfg), Arc::new(RandomFallback::new()))
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub async fn analyze(&self, input: ScenarioInput) -> Scenario {
        self.analyze_reported(input).await.scenario
    }

    pub async fn analyze_reported(&self, input: ScenarioInput) -> AnalysisOutcome {
        let input = input.normalized();
        let request = SimulateRequest {
            scenario: build_scenario_text(&input),
            context: None,
        };
        let text_id = anon_hash(&request.scenario);
        let started = Instant::now();

        let (analysis, fallback_cause) = match self.transport.simulate(&request).await {
            Ok(raw) => {
                info!(
                    %text_id,
                    transport = self.transport.name(),
                    "analysis received"
                );
                counter!("scenario_analysis_total", "source" => "remote").increment(1);
                (mapper::map(Some(&raw), &input), None)
            }
            Err(e) => {
                warn!(
                    %text_id,
                    transport = self.transport.name(),
                    error = %e,
                    "analysis unavailable, using fallback"
                );
                counter!("scenario_analysis_total", "source" => "fallback").increment(1);
                counter!("scenario_analysis_fallback_total", "cause" => e.cause()).increment(1);
                (self.fallback.generate(&input), Some(e))
            }
        };
        histogram!("scenario_analysis_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        let scenario = Scenario::new(self.ids.next_id(), input, analysis);
        AnalysisOutcome {
            scenario,
            fallback_cause,
        }
    }

    /// Ask the service how it is configured; never fails.
    pub async fn probe(&self) -> BackendStatus {
        match self.transport.health().await {
            Ok(h) => match h.llm_provider.filter(|p| !p.is_empty() && p != "mock") {
                Some(provider) => BackendStatus::Connected {
                    provider,
                    model: h.llm_model,
                },
                None => BackendStatus::Mock,
            },
            Err(e) => {
                warn!(error = %e, "analysis service health check failed");
                BackendStatus::Disconnected {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Human-readable scenario text sent to the service.
pub fn build_scenario_text(input: &ScenarioInput) -> String {
    let mut parts = vec![
        format!("{}: {}", input.name, input.description),
        format!("Target market: {}", input.target_market),
        format!("Timeline: {}", input.timeline),
    ];
    if let Some(r) = input.resources.as_deref().filter(|r| !r.is_empty()) {
        parts.push(format!("Resources: {r}"));
    }
    if !input.assumptions.is_empty() {
        parts.push(format!("Assumptions: {}", input.assumptions.join("; ")));
    }
    format!("{}.", parts.join(". "))
}

/// Short SHA-256 prefix; scenario text is never logged raw.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
