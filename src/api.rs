use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::app::{SharedApp, Snapshot, StageView};
use crate::data::{STAGES, VERB_BANK};
use crate::session::SessionError;
use crate::timer::AutoAdvance;

#[derive(Clone)]
pub struct ApiState {
    pub app: SharedApp,
}

pub fn app_router(state: ApiState, static_dir: &str) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/catalog", get(get_catalog))
        .route("/api/settings", put(update_settings))
        .route("/api/session/start", post(start_session))
        .route("/api/session/submit", post(submit_answer))
        .route("/api/session/advance", post(advance))
        .route("/api/session/restart", post(restart_session))
        .route("/api/session/setup", post(back_to_setup))
        .route("/api/progress", delete(reset_progress))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SessionError::UnknownVerb(_)
            | SessionError::UnknownStage(_)
            | SessionError::InvalidSessionLength(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::CONFLICT,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult = Result<Json<Snapshot>, ApiError>;

async fn get_state(State(state): State<ApiState>) -> Json<Snapshot> {
    Json(state.app.lock().await.snapshot())
}

#[derive(Serialize)]
struct VerbView {
    key: &'static str,
    gloss: &'static str,
    enabled: bool,
}

#[derive(Serialize)]
struct Catalog {
    verbs: Vec<VerbView>,
    stages: Vec<StageView>,
}

async fn get_catalog(State(state): State<ApiState>) -> Json<Catalog> {
    let app = state.app.lock().await;
    let verbs = VERB_BANK
        .iter()
        .map(|v| VerbView {
            key: v.key,
            gloss: v.gloss,
            enabled: app.enabled_verbs().iter().any(|e| e == v.key),
        })
        .collect();
    let stages = STAGES
        .iter()
        .enumerate()
        .map(|(i, s)| StageView::new(i, s))
        .collect();
    Json(Catalog { verbs, stages })
}

#[derive(Deserialize)]
struct SettingsRequest {
    enabled_verbs: Option<Vec<String>>,
    stage: Option<usize>,
    session_length: Option<u32>,
}

async fn update_settings(
    State(state): State<ApiState>,
    Json(payload): Json<SettingsRequest>,
) -> ApiResult {
    let mut app = state.app.lock().await;
    if let Some(length) = payload.session_length {
        app.set_session_length(length)?;
    }
    if let Some(stage) = payload.stage {
        app.set_stage(stage)?;
    }
    if let Some(verbs) = payload.enabled_verbs {
        app.set_enabled_verbs(verbs)?;
    }
    Ok(Json(app.snapshot()))
}

async fn start_session(State(state): State<ApiState>) -> ApiResult {
    let mut app = state.app.lock().await;
    app.start()?;
    Ok(Json(app.snapshot()))
}

#[derive(Deserialize)]
struct SubmitRequest {
    answer: String,
}

async fn submit_answer(
    State(state): State<ApiState>,
    Json(payload): Json<SubmitRequest>,
) -> ApiResult {
    let mut app = state.app.lock().await;
    let outcome = app.submit(&payload.answer)?;

    if outcome.should_auto_advance() {
        let timer = AutoAdvance::schedule(state.app.clone(), outcome.ticket, app.auto_advance_delay());
        app.arm_auto_advance(timer);
    }
    Ok(Json(app.snapshot()))
}

#[derive(Deserialize)]
struct AdvanceRequest {
    ticket: Option<Uuid>,
}

async fn advance(
    State(state): State<ApiState>,
    payload: Option<Json<AdvanceRequest>>,
) -> Json<Snapshot> {
    let ticket = payload.and_then(|Json(p)| p.ticket);
    let mut app = state.app.lock().await;
    app.advance(ticket);
    Json(app.snapshot())
}

async fn restart_session(State(state): State<ApiState>) -> ApiResult {
    let mut app = state.app.lock().await;
    app.restart()?;
    Ok(Json(app.snapshot()))
}

async fn back_to_setup(State(state): State<ApiState>) -> Json<Snapshot> {
    let mut app = state.app.lock().await;
    app.back_to_setup();
    Json(app.snapshot())
}

async fn reset_progress(State(state): State<ApiState>) -> Json<Snapshot> {
    let mut app = state.app.lock().await;
    app.reset_progress();
    Json(app.snapshot())
}
