//! Layout session REST routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use layout::catalog::PanelSpec;
use layout::command::Command;
use layout::engine::{ImageFrame, View};
use layout::metrics::Metrics;
use layout::overlay::Overlay;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::services::session::{self, CommandReply, SessionError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionBody {
    pub image: Option<ImageFrame>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub view: View,
}

pub(crate) fn session_error_to_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::LimitReached(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn to_status(err: SessionError) -> StatusCode {
    if matches!(err, SessionError::LimitReached(_)) {
        warn!(error = %err, "session: rejected");
    }
    session_error_to_status(&err)
}

/// `GET /api/panels`: the panel catalog sessions choose from.
pub async fn list_panels(State(state): State<AppState>) -> Json<Vec<PanelSpec>> {
    Json(state.catalog.panels().to_vec())
}

/// `POST /api/sessions`: start a layout session. The body is optional.
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionBody>>,
) -> Result<(StatusCode, Json<SessionResponse>), StatusCode> {
    let image = body.and_then(|Json(body)| body.image);
    let (id, view) = session::create_session(&state, image).await.map_err(to_status)?;
    Ok((StatusCode::CREATED, Json(SessionResponse { id, view })))
}

/// `GET /api/sessions/:id`: current view of a session.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<View>, StatusCode> {
    session::view(&state, id).await.map(Json).map_err(to_status)
}

/// `DELETE /api/sessions/:id`: drop a session.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    session::delete_session(&state, id).await.map_err(to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/sessions/:id/commands`: apply one command.
pub async fn post_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<Command>,
) -> Result<Json<CommandReply>, StatusCode> {
    session::execute(&state, id, command).await.map(Json).map_err(to_status)
}

/// `GET /api/sessions/:id/metrics`: system size and production estimate.
/// 404 until a panel model is chosen.
pub async fn get_metrics(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Metrics>, StatusCode> {
    let view = session::view(&state, id).await.map_err(to_status)?;
    view.metrics.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// `GET /api/sessions/:id/overlay`: geometry for an external renderer.
pub async fn get_overlay(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Overlay>, StatusCode> {
    let session = session::get_session(&state, id).await.map_err(to_status)?;
    let mut live = session.lock().await;
    Ok(Json(live.touch().overlay()))
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
