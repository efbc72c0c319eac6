//! HTTP surface for the scenario-planning UI: scenario CRUD, comparison
//! selection, backend status and budget allocation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::allocation::{AllocationBreakdown, AllocationRequest};
use crate::client::{AnalysisClient, BackendStatus};
use crate::error::InputError;
use crate::scenario::{Scenario, ScenarioInput};
use crate::store::ScenarioStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ScenarioStore>>,
    pub client: Arc<AnalysisClient>,
}

impl AppState {
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            store: Arc::new(Mutex::new(ScenarioStore::new())),
            client: Arc::new(client),
        }
    }

    /// The store lock is only ever held for synchronous work, never across an await.
    fn store(&self) -> MutexGuard<'_, ScenarioStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/backend/status", get(backend_status))
        .route("/scenarios", get(list_scenarios).post(create_scenario))
        .route("/scenarios/{id}", axum::routing::delete(delete_scenario))
        .route("/scenarios/{id}/toggle", post(toggle_selection))
        .route("/selection", get(get_selection).delete(clear_selection))
        .route("/compare", get(compare))
        .route("/allocate", post(allocate))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct StatusOut {
    #[serde(flatten)]
    status: BackendStatus,
    message: String,
}

async fn backend_status(State(state): State<AppState>) -> Json<StatusOut> {
    let status = state.client.probe().await;
    Json(StatusOut {
        message: status.message(),
        status,
    })
}

async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<Scenario>> {
    Json(state.store().scenarios().to_vec())
}

async fn create_scenario(
    State(state): State<AppState>,
    Json(input): Json<ScenarioInput>,
) -> Result<impl IntoResponse, InputError> {
    input.validate()?;
    let scenario = state.client.analyze(input).await;
    info!(
        id = %scenario.id,
        source = ?scenario.analysis.source,
        feasibility = scenario.analysis.feasibility,
        "scenario added"
    );
    state.store().add(scenario.clone());
    Ok((StatusCode::CREATED, Json(scenario)))
}

async fn delete_scenario(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store().remove(&id);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub selected_ids: Vec<String>,
    pub count: usize,
    pub can_compare: bool,
}

impl SelectionView {
    fn of(store: &ScenarioStore) -> Self {
        Self {
            selected_ids: store.selected_ids(),
            count: store.selection_len(),
            can_compare: store.can_compare(),
        }
    }
}

async fn toggle_selection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<SelectionView> {
    let mut store = state.store();
    store.toggle_select(&id);
    Json(SelectionView::of(&store))
}

async fn get_selection(State(state): State<AppState>) -> Json<SelectionView> {
    Json(SelectionView::of(&state.store()))
}

async fn clear_selection(State(state): State<AppState>) -> Json<SelectionView> {
    let mut store = state.store();
    store.clear_selection();
    Json(SelectionView::of(&store))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub can_compare: bool,
    pub scenarios: Vec<Scenario>,
}

async fn compare(State(state): State<AppState>) -> Json<ComparisonView> {
    let store = state.store();
    Json(ComparisonView {
        can_compare: store.can_compare(),
        scenarios: store.selected().into_iter().cloned().collect(),
    })
}

async fn allocate(
    Json(req): Json<AllocationRequest>,
) -> Result<Json<AllocationBreakdown>, InputError> {
    let breakdown = req.allocate()?;
    counter!("allocation_requests_total", "risk_profile" => breakdown.risk_profile.as_str())
        .increment(1);
    Ok(Json(breakdown))
}
