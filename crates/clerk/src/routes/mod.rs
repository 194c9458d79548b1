//! HTTP route handlers for Clerk.

use axum::{
    Json, Router,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use redtape_common::RedTapeError;
use redtape_common::constants::headers::X_FORM_SESSION;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod captcha;
mod form;
mod health;
pub mod page;
mod session;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // The form itself
        .route("/", get(page::form_page))
        .route("/health", get(health::health_check))

        // Session lifecycle
        .route("/session", post(session::create_session).get(session::snapshot))

        // Form fields
        .route("/dob", post(form::update_birth_date))
        .route("/email", post(form::update_emails))
        .route("/location", post(form::drop_pin))
        .route("/submit", post(form::submit))

        // Captcha gauntlet
        .nest("/captcha", captcha_routes())

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn captcha_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(captcha::catalog))
        .route("/open", post(captcha::open))
        .route("/toggle", post(captcha::toggle))
        .route("/submit", post(captcha::submit))
        .route("/play", post(captcha::play))
        .route("/close", post(captcha::close))
}

/// Error response wrapper
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] RedTapeError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_user_error() {
            tracing::debug!(error = %self.0, "Request rejected");
        } else {
            tracing::warn!(error = %self.0, status = %status, "Request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Session token taken from the `X-Form-Session` header
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(X_FORM_SESSION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| SessionToken(value.to_string()))
            .ok_or_else(|| {
                RedTapeError::InvalidInput(format!("missing {X_FORM_SESSION} header")).into()
            })
    }
}
