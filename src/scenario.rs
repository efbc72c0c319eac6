//! scenario.rs: data model shared by the analysis pipeline, the store and the API.
//!
//! Outbound shapes are camelCase because the consumer is a browser UI that binds
//! to them directly (`targetMarket`, `createdAt`, `keyMetrics`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InputError;

/// User-authored description of a business scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_market: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub resources: Option<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl ScenarioInput {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target_market: impl Into<String>,
        timeline: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            target_market: target_market.into(),
            timeline: timeline.into(),
            resources: None,
            assumptions: Vec::new(),
        }
    }

    pub fn with_resources(mut self, resources: impl Into<String>) -> Self {
        self.resources = Some(resources.into());
        self
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }

    /// Trim assumptions and drop blank ones; a blank `resources` becomes `None`.
    pub fn normalized(mut self) -> Self {
        self.assumptions = self
            .assumptions
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        self.resources = self
            .resources
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.name.trim().is_empty() {
            return Err(InputError::EmptyName);
        }
        Ok(())
    }
}

/// Direction indicator rendered next to a key metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Neutral,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub label: String,
    pub value: String,
    pub trend: Trend,
}

impl KeyMetric {
    pub fn new(label: impl Into<String>, value: impl Into<String>, trend: Trend) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            trend,
        }
    }
}

/// Where the numbers of an analysis came from. Remote and fallback scores are
/// produced by unrelated processes and must not be compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    Fallback,
}

/// Bounded, UI-safe analysis attached 1:1 to a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAnalysis {
    /// Percentage in `0..=100`.
    pub feasibility: u8,
    /// Percentage in `0..=100`.
    pub impact: u8,
    pub risks: Vec<String>,
    /// At most [`MAX_OPPORTUNITIES`] entries.
    pub opportunities: Vec<String>,
    pub recommendation: String,
    /// Always exactly four entries, see [`crate::analyze::scoring::METRIC_LABELS`].
    pub key_metrics: Vec<KeyMetric>,
    pub source: AnalysisSource,
    /// Verbatim `reasons` object of the remote payload.
    pub reasons: Option<Value>,
    /// Verbatim `recommendation` object of the remote payload.
    pub recommendation_detail: Option<Value>,
    /// Complete remote payload, opaque.
    pub raw: Option<Value>,
}

pub const MAX_OPPORTUNITIES: usize = 6;

/// A submitted scenario together with its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    #[serde(flatten)]
    pub input: ScenarioInput,
    pub created_at: DateTime<Utc>,
    pub analysis: ScenarioAnalysis,
}

impl Scenario {
    pub fn new(id: impl Into<String>, input: ScenarioInput, analysis: ScenarioAnalysis) -> Self {
        Self {
            id: id.into(),
            input,
            created_at: Utc::now(),
            analysis,
        }
    }
}
