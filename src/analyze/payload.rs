//! Explicit optional-field view of the analysis service response.
//!
//! Every field is independently optional. A field that is present but has the
//! wrong JSON type decodes as `None` instead of failing the whole document, and a
//! document that is not an object decodes as [`RawAnalysis::default`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Decode a field, mapping any type mismatch to `None`.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).ok())
}

/// Keep only well-formed elements of an array; anything else is an empty list.
fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|it| serde_json::from_value(it).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawScores {
    #[serde(default, deserialize_with = "lenient")]
    pub risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub competitive: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub overall: Option<f64>,
}

/// Same four keys are used for `reasons` and `impacts`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTexts {
    #[serde(default, deserialize_with = "lenient")]
    pub risk: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub competitive: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTopRisk {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mitigation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecommendation {
    #[serde(default, deserialize_with = "lenient")]
    pub rationale: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub decision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "lenient")]
    pub scores: Option<RawScores>,
    #[serde(default, deserialize_with = "lenient")]
    pub reasons: Option<RawTexts>,
    #[serde(default, deserialize_with = "lenient")]
    pub impacts: Option<RawTexts>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub top_risks: Vec<RawTopRisk>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub opportunities: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub recommendation: Option<RawRecommendation>,
}

impl RawAnalysis {
    pub fn from_value(v: &Value) -> Self {
        if !v.is_object() {
            return Self::default();
        }
        serde_json::from_value(v.clone()).unwrap_or_default()
    }

    pub fn scores(&self) -> RawScores {
        self.scores.clone().unwrap_or_default()
    }

    pub fn reasons(&self) -> RawTexts {
        self.reasons.clone().unwrap_or_default()
    }

    pub fn impacts(&self) -> RawTexts {
        self.impacts.clone().unwrap_or_default()
    }

    pub fn rationale(&self) -> String {
        self.recommendation
            .as_ref()
            .and_then(|r| r.rationale.clone())
            .unwrap_or_default()
    }
}
