//! Remote payload → [`ScenarioAnalysis`].
//!
//! Pure and total: any JSON value (or none at all) produces an analysis that
//! satisfies the UI invariants. Field order of the derived lists is fixed so
//! two renders of the same payload are identical.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::payload::{RawAnalysis, RawTopRisk};
use super::scoring::{
    clamp_percent, key_metrics, percent_or, DEFAULT_FEASIBILITY, DEFAULT_IMPACT, DEFAULT_RISK,
    IMPACT_BASELINE,
};
use crate::scenario::{AnalysisSource, ScenarioAnalysis, ScenarioInput, MAX_OPPORTUNITIES};

/// Competitive reasoning worth surfacing as an opportunity.
static COMPETITIVE_SIGNAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)advantage|position|differentiation").expect("competitive regex"));

/// Customer reasoning worth surfacing as an opportunity.
static CUSTOMER_SIGNAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)growth|upsell|benefit|retention").expect("customer regex"));

/// Map a remote payload onto the UI model. `raw == None` yields the all-default analysis.
pub fn map(raw: Option<&Value>, input: &ScenarioInput) -> ScenarioAnalysis {
    let doc = raw.map(RawAnalysis::from_value).unwrap_or_default();
    let scores = doc.scores();

    let feasibility = percent_or(scores.overall, DEFAULT_FEASIBILITY);
    let impact = clamp_percent(
        scores.customer.unwrap_or(0.0) + scores.competitive.unwrap_or(0.0) + IMPACT_BASELINE,
        DEFAULT_IMPACT,
    );
    // raw scores: key_metrics clamps for display and reads trends unclamped
    let risk = scores.risk.unwrap_or(f64::from(DEFAULT_RISK));
    let customer = scores.customer.unwrap_or(0.0);

    let key_metrics = key_metrics(feasibility, &input.timeline, risk, customer);

    ScenarioAnalysis {
        feasibility,
        impact,
        risks: risk_list(&doc),
        opportunities: opportunity_list(&doc),
        recommendation: doc.rationale(),
        key_metrics,
        source: AnalysisSource::Remote,
        reasons: raw.and_then(|v| v.get("reasons")).cloned(),
        recommendation_detail: raw.and_then(|v| v.get("recommendation")).cloned(),
        raw: raw.cloned(),
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|t| !t.trim().is_empty())
}

fn format_top_risk(r: &RawTopRisk) -> Option<String> {
    let title = non_blank(r.title.as_deref())?;
    Some(match non_blank(r.mitigation.as_deref()) {
        Some(m) => format!("{title} — Mitigation: {m}"),
        None => title.to_string(),
    })
}

/// Impacts in fixed order, then one line per top risk; blanks and repeats dropped.
fn risk_list(doc: &RawAnalysis) -> Vec<String> {
    let impacts = doc.impacts();
    let fixed = [
        impacts.risk.as_deref(),
        impacts.customer.as_deref(),
        impacts.competitive.as_deref(),
        impacts.cost.as_deref(),
    ];

    let mut out: Vec<String> = Vec::new();
    let candidates = fixed
        .into_iter()
        .filter_map(|s| non_blank(s).map(str::to_string))
        .chain(doc.top_risks.iter().filter_map(format_top_risk));
    for c in candidates {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

fn opportunity_list(doc: &RawAnalysis) -> Vec<String> {
    let reasons = doc.reasons();

    let competitive = non_blank(reasons.competitive.as_deref())
        .filter(|t| COMPETITIVE_SIGNAL.is_match(t))
        .map(str::to_string);
    let customer = non_blank(reasons.customer.as_deref())
        .filter(|t| CUSTOMER_SIGNAL.is_match(t))
        .map(str::to_string);

    doc.opportunities
        .iter()
        .filter(|o| !o.trim().is_empty())
        .cloned()
        .chain(competitive)
        .chain(customer)
        .take(MAX_OPPORTUNITIES)
        .collect()
}
