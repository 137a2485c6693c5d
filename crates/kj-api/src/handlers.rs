//! REST API handlers.
//!
//! Each handler takes the rotation lock, runs one scheduler operation, and
//! returns a JSON envelope.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use kj_rotation::{Notice, RotationError};
use kj_store::EntryStore;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            notice: None,
        })
    }

    fn ok_with_notice(data: T, notice: Option<Notice>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            notice: notice.map(|n| n.to_string()),
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
            notice: None,
        }),
    )
}

/// Map a scheduler error onto an HTTP status.
fn rotation_error(err: RotationError) -> axum::response::Response {
    let status = match &err {
        RotationError::EmptyName => StatusCode::BAD_REQUEST,
        RotationError::NoActivePerformer
        | RotationError::InsufficientQueue
        | RotationError::ShowInProgress => StatusCode::CONFLICT,
        RotationError::InsufficientSingers(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RotationError::Store(_) => {
            warn!(error = %err, "store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(&err.to_string(), status).into_response()
}

// ── Queue ──────────────────────────────────────────────────────

/// GET /api/v1/queue
pub async fn get_queue(State(state): State<ApiState>) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.queue() {
        Ok(view) => ApiResponse::ok(view).into_response(),
        Err(e) => rotation_error(e),
    }
}

/// GET /api/v1/entries
pub async fn list_entries(State(state): State<ApiState>) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.store().read_all() {
        Ok(entries) => ApiResponse::ok(entries).into_response(),
        Err(e) => rotation_error(e.into()),
    }
}

/// GET /api/v1/next
pub async fn peek_next(State(state): State<ApiState>) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.peek_next() {
        Ok(next) => Json(ApiResponse {
            success: true,
            data: next,
            error: None,
            notice: None,
        })
        .into_response(),
        Err(e) => rotation_error(e),
    }
}

// ── Registration ───────────────────────────────────────────────

/// Registration request body.
#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

/// POST /api/v1/entries
pub async fn register_singer(
    State(state): State<ApiState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.on_new_registration(&req.name) {
        Ok(entry) => (StatusCode::CREATED, ApiResponse::ok(entry)).into_response(),
        Err(e) => rotation_error(e),
    }
}

// ── Show control ───────────────────────────────────────────────

/// Query parameters for starting the show.
#[derive(serde::Deserialize, Default)]
pub struct StartParams {
    /// Restart even if someone is already on stage.
    #[serde(default)]
    pub force: bool,
}

/// POST /api/v1/show/start
pub async fn start_show(
    State(state): State<ApiState>,
    Query(params): Query<StartParams>,
) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.on_start_show(params.force) {
        Ok(outcome) => ApiResponse::ok_with_notice(outcome.mutations, outcome.notice).into_response(),
        Err(e) => rotation_error(e),
    }
}

/// POST /api/v1/show/advance
pub async fn advance(State(state): State<ApiState>) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.on_advance() {
        Ok(outcome) => ApiResponse::ok_with_notice(outcome.mutations, outcome.notice).into_response(),
        Err(e) => rotation_error(e),
    }
}

/// POST /api/v1/show/skip
pub async fn skip(State(state): State<ApiState>) -> impl IntoResponse {
    let rotation = state.rotation.lock().await;
    match rotation.on_skip() {
        Ok(outcome) => ApiResponse::ok_with_notice(outcome.mutations, outcome.notice).into_response(),
        Err(e) => rotation_error(e),
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
