//! Score normalization helpers.
//!
//! Every number that leaves the analysis layer passes through here, so the UI
//! only ever sees integer percentages in `0..=100`. Absent or non-finite inputs
//! are replaced by the documented fallback constants below.

use crate::scenario::{KeyMetric, Trend};

/// Fallback for `scores.overall` when the payload has none.
pub const DEFAULT_FEASIBILITY: u8 = 70;
/// Fallback for the impact heuristic when it cannot be computed.
pub const DEFAULT_IMPACT: u8 = 75;
/// Fallback for `scores.risk`.
pub const DEFAULT_RISK: u8 = 50;
/// Offset added to `customer + competitive` for the impact heuristic.
pub const IMPACT_BASELINE: f64 = 50.0;

pub const LABEL_FEASIBILITY: &str = "Feasibility Score";
pub const LABEL_TIME_TO_MARKET: &str = "Time to Market";
pub const LABEL_RISK_LEVEL: &str = "Risk Level";
pub const LABEL_CUSTOMER_IMPACT: &str = "Customer Impact";

/// Labels of the four key metrics, in rendering order.
pub const METRIC_LABELS: [&str; 4] = [
    LABEL_FEASIBILITY,
    LABEL_TIME_TO_MARKET,
    LABEL_RISK_LEVEL,
    LABEL_CUSTOMER_IMPACT,
];

/// Round and clamp a finite value into `0..=100`; otherwise return `fallback`.
pub fn clamp_percent(value: f64, fallback: u8) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        fallback.min(100)
    }
}

/// [`clamp_percent`] for a value that may be missing altogether.
pub fn percent_or(value: Option<f64>, fallback: u8) -> u8 {
    clamp_percent(value.unwrap_or(f64::NAN), fallback)
}

/// Customer impact label: the clamped percent, with a `+` when the raw score is
/// positive. Negative scores render as `0%`; the trend carries the sign.
pub fn format_customer_impact(customer: f64) -> String {
    let sign = if customer > 0.0 { "+" } else { "" };
    format!("{sign}{}%", clamp_percent(customer, 0))
}

pub fn feasibility_trend(feasibility: u8) -> Trend {
    if feasibility >= 70 {
        Trend::Up
    } else if feasibility >= 50 {
        Trend::Neutral
    } else {
        Trend::Down
    }
}

/// Higher risk is worse, so the arrow points down. Compared on the raw score.
pub fn risk_trend(risk: f64) -> Trend {
    if risk > 70.0 {
        Trend::Down
    } else if risk > 50.0 {
        Trend::Neutral
    } else {
        Trend::Up
    }
}

/// Sign of the raw score; `0.3` is already up even though it renders as `+0%`.
pub fn customer_trend(customer: f64) -> Trend {
    if customer > 0.0 {
        Trend::Up
    } else if customer < 0.0 {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Build the four key metrics in their fixed order.
///
/// `risk` and `customer` are raw scores: values are clamped for display, trends
/// are taken from the unclamped numbers. Non-finite scores fall back to
/// [`DEFAULT_RISK`] and `0`.
pub fn key_metrics(feasibility: u8, timeline: &str, risk: f64, customer: f64) -> Vec<KeyMetric> {
    let risk = if risk.is_finite() { risk } else { f64::from(DEFAULT_RISK) };
    let customer = if customer.is_finite() { customer } else { 0.0 };
    vec![
        KeyMetric::new(
            LABEL_FEASIBILITY,
            format!("{feasibility}%"),
            feasibility_trend(feasibility),
        ),
        KeyMetric::new(LABEL_TIME_TO_MARKET, timeline, Trend::Neutral),
        KeyMetric::new(
            LABEL_RISK_LEVEL,
            format!("{}%", clamp_percent(risk, DEFAULT_RISK)),
            risk_trend(risk),
        ),
        KeyMetric::new(
            LABEL_CUSTOMER_IMPACT,
            format_customer_impact(customer),
            customer_trend(customer),
        ),
    ]
}
