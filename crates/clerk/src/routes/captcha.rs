//! Captcha gauntlet endpoints.
//!
//! Every mutating endpoint answers with the captcha view right after the
//! transition; later timer-driven changes show up on the next session poll.

use axum::{Json, extract::State};
use redtape_common::{CaptchaView, Choice};
use serde::Deserialize;

use super::{ApiError, SessionToken};
use crate::captcha::Tile;
use crate::state::AppState;

/// Tile artwork in display order (answers stay server-side)
pub async fn catalog(State(state): State<AppState>) -> Json<Vec<Tile>> {
    Json(state.tiles.tiles().to_vec())
}

async fn current_view(state: &AppState, id: &str) -> Result<Json<CaptchaView>, ApiError> {
    let view = state
        .sessions
        .read_session(id, |session| session.captcha.view())
        .await?;
    Ok(Json(view))
}

/// Open (or reopen) the challenge
pub async fn open(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
) -> Result<Json<CaptchaView>, ApiError> {
    state
        .sessions
        .drive(&id, |session| Ok(session.captcha.open()))
        .await?;
    current_view(&state, &id).await
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    id: u8,
}

/// Select or deselect one tile
pub async fn toggle(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<CaptchaView>, ApiError> {
    state
        .sessions
        .drive(&id, |session| session.captcha.toggle(payload.id))
        .await?;
    current_view(&state, &id).await
}

/// Submit the tile selection for checking
pub async fn submit(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
) -> Result<Json<CaptchaView>, ApiError> {
    state
        .sessions
        .drive(&id, |session| Ok(session.captcha.submit_images()))
        .await?;
    current_view(&state, &id).await
}

#[derive(Deserialize)]
pub struct PlayRequest {
    choice: Choice,
}

/// Throw one rock-paper-scissors move
pub async fn play(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
    Json(payload): Json<PlayRequest>,
) -> Result<Json<CaptchaView>, ApiError> {
    state
        .sessions
        .drive(&id, |session| {
            Ok(session.captcha.play(payload.choice, &mut rand::rng()))
        })
        .await?;
    current_view(&state, &id).await
}

/// Close the modal (only once the gauntlet is complete)
pub async fn close(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
) -> Result<Json<CaptchaView>, ApiError> {
    state
        .sessions
        .drive(&id, |session| session.captcha.close())
        .await?;
    current_view(&state, &id).await
}
