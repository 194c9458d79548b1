//! Form field endpoints and the final (pointless) submission.

use axum::{Json, extract::State};
use redtape_common::constants::copy;
use redtape_common::{BirthDateView, LocationView};
use serde::{Deserialize, Serialize};

use super::{ApiError, SessionToken};
use crate::form::PinDrop;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BirthColorRequest {
    /// Raw color picker value, possibly half-typed
    color: String,
}

/// Re-decode the date of birth from the picker value
pub async fn update_birth_date(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
    Json(payload): Json<BirthColorRequest>,
) -> Result<Json<BirthDateView>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let view = state
        .sessions
        .with_session(&id, |session| {
            if session.birth_date.update(&payload.color) {
                tracing::debug!(session = %id, color = %payload.color, "Birth date re-decoded");
            }
            session.birth_date.view(today)
        })
        .await?;

    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    confirm_email: String,
}

#[derive(Serialize)]
pub struct EmailResponse {
    alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Compare the two email fields, sounding the siren on mismatch
pub async fn update_emails(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<EmailResponse>, ApiError> {
    let alert = state
        .sessions
        .with_session(&id, |session| {
            session.update_emails(&payload.email, &payload.confirm_email)
        })
        .await?;

    Ok(Json(EmailResponse {
        alert,
        message: alert.then_some(copy::EMAIL_MISMATCH),
    }))
}

/// Record a map pin and judge it against the required region
pub async fn drop_pin(
    State(state): State<AppState>,
    SessionToken(id): SessionToken,
    Json(pin): Json<PinDrop>,
) -> Result<Json<LocationView>, ApiError> {
    pin.validate()?;
    let view = state.region.judge(&pin);

    tracing::debug!(
        session = %id,
        region_code = ?pin.region_code,
        country_code = ?pin.country_code,
        valid = view.valid,
        "Map pin dropped"
    );

    state
        .sessions
        .with_session(&id, |session| session.location = Some(view.clone()))
        .await?;

    Ok(Json(view))
}

#[derive(Serialize)]
pub struct SubmitResponse {
    message: &'static str,
}

/// Accept the form and throw it away. Nothing is read, stored, or validated.
pub async fn submit() -> Json<SubmitResponse> {
    tracing::info!("📭 Form submitted and discarded");
    Json(SubmitResponse {
        message: copy::SUBMISSION_RECEIPT,
    })
}
