//! Error taxonomy.
//!
//! `AnalysisError` never reaches the UI as a failure: the client recovers from
//! every variant by switching to the fallback generator and reports the cause
//! on the log channel. `InputError` is raised by the HTTP layer before the core
//! is invoked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Why a remote analysis could not be used.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis service is disabled")]
    Disabled,
    #[error("analysis service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("analysis service returned an unreadable body: {0}")]
    Body(String),
}

impl AnalysisError {
    /// Short, stable label used as a metrics dimension.
    pub fn cause(&self) -> &'static str {
        match self {
            AnalysisError::Disabled => "disabled",
            AnalysisError::Transport(e) if e.is_timeout() => "timeout",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Status { .. } => "status",
            AnalysisError::Body(_) => "body",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("total budget must be a positive number (got {0})")]
    NonPositiveBudget(f64),
    #[error("trading percent must be within 0..=100 (got {0})")]
    TradingPercentOutOfRange(f64),
    #[error("unknown risk profile '{0}' (expected low, medium or high)")]
    UnknownRiskProfile(String),
}

impl IntoResponse for InputError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}
