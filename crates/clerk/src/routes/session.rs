//! Session creation and polling.

use axum::{Json, extract::State, http::StatusCode};
use redtape_common::SessionSnapshot;
use serde::Serialize;

use super::{ApiError, SessionToken};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    session_id: String,
}

/// Start a new form session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// Current state plus every cue queued since the last poll
pub async fn snapshot(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let snapshot = state
        .sessions
        .with_session(&id, |session| session.snapshot(today))
        .await?;

    Ok(Json(snapshot))
}
