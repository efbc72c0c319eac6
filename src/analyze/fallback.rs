//! Offline fallback analysis.
//!
//! Used only when the analysis service cannot be reached or returns something
//! unusable. The output has the same shape as [`super::mapper::map`] (same
//! fields, same four metric labels in the same order); only the numbers differ.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::scoring::key_metrics;
use crate::scenario::{AnalysisSource, ScenarioAnalysis, ScenarioInput};

/// Strategy seam for the fallback so tests can pin the numbers.
pub trait FallbackGenerator: Send + Sync {
    fn generate(&self, input: &ScenarioInput) -> ScenarioAnalysis;
}

pub const FALLBACK_RISKS: [&str; 4] = [
    "Market adoption may be slower than anticipated",
    "Resource allocation conflicts with existing priorities",
    "Technical dependencies on third-party vendors",
    "Competitive response could accelerate timeline pressures",
];

pub const FALLBACK_OPPORTUNITIES: [&str; 4] = [
    "First-mover advantage in emerging market segment",
    "Potential for strategic partnerships with key players",
    "Strong alignment with long-term company vision",
    "Opportunity to establish industry standards",
];

pub const RECOMMEND_HIGH: &str =
    "High priority - Recommend immediate execution with full resource allocation";
pub const RECOMMEND_MEDIUM: &str =
    "Medium priority - Validate assumptions with user research before proceeding";
pub const RECOMMEND_LOW: &str =
    "Low priority - Consider alternative approaches or defer until resources available";

pub fn recommendation_for(feasibility: u8, impact: u8) -> &'static str {
    if feasibility > 80 && impact > 80 {
        RECOMMEND_HIGH
    } else if feasibility > 70 {
        RECOMMEND_MEDIUM
    } else {
        RECOMMEND_LOW
    }
}

/// Assemble a fallback analysis from already-drawn numbers.
pub fn build(
    input: &ScenarioInput,
    feasibility: u8,
    impact: u8,
    risk: u8,
    customer: i8,
) -> ScenarioAnalysis {
    ScenarioAnalysis {
        feasibility,
        impact,
        risks: FALLBACK_RISKS.iter().map(|s| s.to_string()).collect(),
        opportunities: FALLBACK_OPPORTUNITIES.iter().map(|s| s.to_string()).collect(),
        recommendation: recommendation_for(feasibility, impact).to_string(),
        key_metrics: key_metrics(
            feasibility,
            &input.timeline,
            f64::from(risk),
            f64::from(customer),
        ),
        source: AnalysisSource::Fallback,
        reasons: None,
        recommendation_detail: None,
        raw: None,
    }
}

/// Uniform draws: feasibility and impact in `70..100`, risk in `20..50`,
/// customer lift in `5..25`.
pub struct RandomFallback {
    rng: Mutex<StdRng>,
}

impl RandomFallback {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence, for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackGenerator for RandomFallback {
    fn generate(&self, input: &ScenarioInput) -> ScenarioAnalysis {
        let (feasibility, impact, risk, customer) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (
                rng.random_range(70..100u8),
                rng.random_range(70..100u8),
                rng.random_range(20..50u8),
                rng.random_range(5..25i8),
            )
        };
        build(input, feasibility, impact, risk, customer)
    }
}

/// Always returns the same numbers.
#[derive(Debug, Clone, Copy)]
pub struct FixedFallback {
    pub feasibility: u8,
    pub impact: u8,
    pub risk: u8,
    pub customer: i8,
}

impl Default for FixedFallback {
    fn default() -> Self {
        Self {
            feasibility: 75,
            impact: 75,
            risk: 35,
            customer: 10,
        }
    }
}

impl FallbackGenerator for FixedFallback {
    fn generate(&self, input: &ScenarioInput) -> ScenarioAnalysis {
        build(
            input,
            self.feasibility.min(100),
            self.impact.min(100),
            self.risk.min(100),
            self.customer.clamp(-100, 100),
        )
    }
}
