// tests/client_http.rs
//
// End-to-end checks of AnalysisClient over a real HTTP transport, against a
// loopback axum server standing in for the analysis service.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use scenario_planner::analyze::{FixedFallback, HttpTransport, METRIC_LABELS};
use scenario_planner::client::{AnalysisClient, BackendStatus};
use scenario_planner::config::AnalysisConfig;
use scenario_planner::scenario::{AnalysisSource, ScenarioInput};
use scenario_planner::AnalysisError;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Base URL of a loopback port that was just released, so nothing listens on it.
async fn closed_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base: &str) -> AnalysisClient {
    let cfg = AnalysisConfig {
        api_base: base.to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..AnalysisConfig::default()
    };
    let transport = HttpTransport::new(&cfg).expect("http transport");
    AnalysisClient::new(Arc::new(transport), Arc::new(FixedFallback::default()))
}

fn input() -> ScenarioInput {
    ScenarioInput::new("Usage pricing", "Move to usage-based pricing", "Developers", "6 weeks")
        .with_assumption("Usage is measurable")
}

fn labels(s: &scenario_planner::Scenario) -> Vec<String> {
    s.analysis.key_metrics.iter().map(|m| m.label.clone()).collect()
}

type Captured = Arc<Mutex<Option<Value>>>;

async fn simulate_ok(State(seen): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    *seen.lock().unwrap() = Some(body);
    Json(json!({
        "scores": { "risk": 72, "customer": 20, "competitive": 10, "overall": 81 },
        "reasons": { "customer": "Strong upsell path for heavy users" },
        "impacts": { "risk": "Billing surprises for spiky workloads" },
        "top_risks": [{ "title": "Revenue volatility", "mitigation": "Floor price" }],
        "opportunities": ["Capture long-tail usage"],
        "recommendation": { "rationale": "Pilot with new signups first." }
    }))
}

#[tokio::test]
async fn successful_call_is_mapped() {
    let seen: Captured = Arc::default();
    let router = Router::new()
        .route("/simulate", post(simulate_ok))
        .with_state(seen.clone());
    let client = client_for(&serve(router).await);

    let out = client.analyze_reported(input()).await;
    assert!(out.fallback_cause.is_none());
    let a = &out.scenario.analysis;
    assert_eq!(a.source, AnalysisSource::Remote);
    assert_eq!(a.feasibility, 81);
    assert_eq!(a.impact, 80);
    assert_eq!(
        a.risks,
        vec![
            "Billing surprises for spiky workloads".to_string(),
            "Revenue volatility — Mitigation: Floor price".to_string(),
        ]
    );
    assert_eq!(
        a.opportunities,
        vec!["Capture long-tail usage", "Strong upsell path for heavy users"]
    );
    assert_eq!(a.recommendation, "Pilot with new signups first.");
    assert_eq!(a.key_metrics[2].value, "72%");
    assert_eq!(a.key_metrics[3].value, "+20%");

    let body = seen.lock().unwrap().clone().expect("request captured");
    assert_eq!(body["context"], Value::Null);
    assert_eq!(
        body["scenario"],
        "Usage pricing: Move to usage-based pricing. Target market: Developers. \
         Timeline: 6 weeks. Assumptions: Usage is measurable."
    );
}

#[tokio::test]
async fn server_error_falls_back() {
    let router = Router::new().route(
        "/simulate",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "LLM quota exhausted" })),
            )
        }),
    );
    let client = client_for(&serve(router).await);

    let out = client.analyze_reported(input()).await;
    assert_eq!(out.scenario.analysis.source, AnalysisSource::Fallback);
    match out.fallback_cause {
        Some(AnalysisError::Status { status, detail }) => {
            assert_eq!(status, 500);
            assert_eq!(detail, "LLM quota exhausted");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let router = Router::new().route("/simulate", post(|| async { "<html>not json</html>" }));
    let client = client_for(&serve(router).await);

    let out = client.analyze_reported(input()).await;
    assert_eq!(out.scenario.analysis.source, AnalysisSource::Fallback);
    assert!(matches!(out.fallback_cause, Some(AnalysisError::Body(_))));
}

#[tokio::test]
async fn unreachable_service_falls_back() {
    let client = client_for(&closed_base().await);
    let out = client.analyze_reported(input()).await;
    assert_eq!(out.scenario.analysis.source, AnalysisSource::Fallback);
    assert!(matches!(out.fallback_cause, Some(AnalysisError::Transport(_))));
    assert!(matches!(client.probe().await, BackendStatus::Disconnected { .. }));
}

#[tokio::test]
async fn success_and_failure_share_metric_labels() {
    let seen: Captured = Arc::default();
    let ok = Router::new()
        .route("/simulate", post(simulate_ok))
        .with_state(seen);
    let ok_client = client_for(&serve(ok).await);
    let bad_client = client_for(&closed_base().await);

    let good = ok_client.analyze(input()).await;
    let bad = bad_client.analyze(input()).await;
    assert_eq!(labels(&good), labels(&bad));
    assert_eq!(labels(&good), METRIC_LABELS.map(String::from).to_vec());
}

#[tokio::test]
async fn probe_reads_provider_from_health() {
    let router = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "status": "ok",
                "llm_provider": "groq",
                "llm_model": "llama-3.3-70b-versatile",
                "llm_mock_mode": false
            }))
        }),
    );
    let client = client_for(&serve(router).await);
    assert_eq!(
        client.probe().await,
        BackendStatus::Connected {
            provider: "groq".into(),
            model: Some("llama-3.3-70b-versatile".into()),
        }
    );

    let mock = Router::new().route(
        "/health",
        get(|| async { Json(json!({ "status": "ok", "llm_provider": "mock" })) }),
    );
    let client = client_for(&serve(mock).await);
    assert_eq!(client.probe().await, BackendStatus::Mock);
}
