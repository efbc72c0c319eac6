//! Analysis service adapter: transport abstraction + concrete transports.
//!
//! The transport only moves JSON. Interpreting the payload is the mapper's job,
//! and recovering from a failed call is the client's job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::analysis::AnalysisConfig;
use crate::error::AnalysisError;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// Body of `POST /simulate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateRequest {
    pub scenario: String,
    /// Always serialized, `null` when absent.
    pub context: Option<Value>,
}

/// Body of `GET /health`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendHealth {
    pub status: Option<String>,
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
    pub llm_mock_mode: Option<bool>,
}

/// Low-level access to the analysis service.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn simulate(&self, request: &SimulateRequest) -> Result<Value, AnalysisError>;
    async fn health(&self) -> Result<BackendHealth, AnalysisError>;
    /// Transport name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynTransport = Arc<dyn AnalysisTransport>;

/// Factory: build a transport according to config.
///
/// * `fixture` (or `ANALYSIS_TEST_MODE=mock`) returns the canned offline payload.
/// * `enabled == false` returns a transport that always fails, so every scenario
///   gets a fallback analysis.
/// * Otherwise an HTTP transport against `api_base`.
pub fn build_transport(cfg: &AnalysisConfig) -> DynTransport {
    if cfg.fixture {
        return Arc::new(FixtureTransport::sample());
    }
    if !cfg.enabled {
        return Arc::new(DisabledTransport);
    }
    match HttpTransport::new(cfg) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            warn!(error = %e, "building HTTP transport failed; analysis disabled");
            Arc::new(DisabledTransport)
        }
    }
}

// ------------------------------------------------------------
// HTTP transport
// ------------------------------------------------------------

pub struct HttpTransport {
    http: reqwest::Client,
    api_base: String,
}

impl HttpTransport {
    pub fn new(cfg: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("scenario-planner/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, AnalysisError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(AnalysisError::Status {
            status: status.as_u16(),
            detail: error_detail(&text),
        })
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn simulate(&self, request: &SimulateRequest) -> Result<Value, AnalysisError> {
        let url = format!("{}/simulate", self.api_base);
        let resp = self.http.post(&url).json(request).send().await?;
        let resp = Self::check_status(resp).await?;
        debug!(status = %resp.status(), "simulate responded");

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AnalysisError::Body(e.to_string()))
    }

    async fn health(&self) -> Result<BackendHealth, AnalysisError> {
        let url = format!("{}/health", self.api_base);
        let resp = self.http.get(&url).send().await?;
        let resp = Self::check_status(resp).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AnalysisError::Body(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Pull `detail` / `error` out of a JSON error body, else keep the text.
/// Capped at 200 chars so a proxy's HTML error page does not flood the log.
pub fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["detail", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string());
    detail.chars().take(200).collect()
}

// ------------------------------------------------------------
// Offline transports
// ------------------------------------------------------------

/// Always fails with [`AnalysisError::Disabled`].
pub struct DisabledTransport;

#[async_trait]
impl AnalysisTransport for DisabledTransport {
    async fn simulate(&self, _request: &SimulateRequest) -> Result<Value, AnalysisError> {
        Err(AnalysisError::Disabled)
    }

    async fn health(&self) -> Result<BackendHealth, AnalysisError> {
        Err(AnalysisError::Disabled)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Returns a fixed payload for every request. Used for offline demos and tests.
#[derive(Clone)]
pub struct FixtureTransport {
    payload: Value,
}

impl FixtureTransport {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// The same document the analysis service returns when it has no LLM key.
    pub fn sample() -> Self {
        Self::new(sample_payload())
    }
}

#[async_trait]
impl AnalysisTransport for FixtureTransport {
    async fn simulate(&self, request: &SimulateRequest) -> Result<Value, AnalysisError> {
        let mut out = self.payload.clone();
        if let Some(obj) = out.as_object_mut() {
            if !obj.contains_key("classification") {
                let class = if request.scenario.to_lowercase().contains("price") {
                    "pricing_change"
                } else {
                    "feature_change"
                };
                obj.insert("classification".into(), json!(class));
            }
        }
        Ok(out)
    }

    async fn health(&self) -> Result<BackendHealth, AnalysisError> {
        Ok(BackendHealth {
            status: Some("ok".into()),
            llm_provider: Some("mock".into()),
            llm_model: None,
            llm_mock_mode: Some(true),
        })
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

fn sample_payload() -> Value {
    json!({
        "scores": { "risk": 48, "customer": -12, "competitive": 18, "cost": 11, "overall": 67 },
        "reasons": {
            "risk": "Short timeline relative to resources raises execution uncertainty.",
            "customer": "Price-sensitive cohort may push back based on scenario details.",
            "competitive": "Move positions the product closer to premium competitors.",
            "cost": "Minor infra savings based on typical SaaS usage patterns."
        },
        "impacts": {
            "risk": "Moderate churn during rollout window.",
            "customer": "Possible downgrade pressure from SMB/Free-to-Pro users.",
            "competitive": "Expect competitive discounting by low-cost rivals.",
            "cost": "Small unit economics improvement."
        },
        "top_risks": [
            { "title": "Churn among SMB-Pro users", "mitigation": "Grandfather existing users for 12 months" },
            { "title": "Sales cycle friction", "mitigation": "Price-lock active POCs for 90 days" }
        ],
        "opportunities": [
            "Raise ARPU among low-support customers",
            "Upsell analytics features for enterprise seats"
        ],
        "recommendation": {
            "decision": "proceed_cautiously",
            "rationale": "Upside aligns with strategic direction, but requires staged rollout.",
            "next_actions": [
                "Run 10% price A/B test for 2 weeks in US SMB segment",
                "Prepare proactive comms with ROI examples",
                "Grandfather all current paid users"
            ],
            "assumptions_to_validate": ["Churn change < 0.5% in first 30 days"],
            "success_metrics": ["ARPU +7% in 30 days", "Support ticket delta < 10%"],
            "confidence": 0.65
        }
    })
}
