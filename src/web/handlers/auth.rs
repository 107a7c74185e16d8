//! Login and logout handlers.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use crate::auth::verify_password;
use crate::user::UserRepository;
use crate::web::dto::TokenResponse;
use crate::web::error::ApiError;
use crate::web::handlers::{session_token, AppState};

/// Pull `(email, password)` out of a Basic authorization header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get("Authorization")?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (email, password) = decoded.split_once(':')?;
    if email.is_empty() || password.is_empty() {
        return None;
    }
    Some((email.to_string(), password.to_string()))
}

/// GET /connect - exchange Basic credentials for a session token.
pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let (email, password) = basic_credentials(&headers).ok_or_else(ApiError::unauthorized)?;

    let users = UserRepository::new(state.db.pool());
    let user = users
        .get_by_email(&email)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    if verify_password(&password, &user.password).is_err() {
        debug!(user_id = user.id, "login rejected: bad password");
        return Err(ApiError::unauthorized());
    }

    let token = state.sessions.create(user.id).await?;
    Ok(Json(TokenResponse { token }))
}

/// GET /disconnect - revoke the current session.
pub async fn disconnect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = session_token(&headers).ok_or_else(ApiError::unauthorized)?;

    // Only an established session may disconnect itself
    if state.sessions.resolve(token).await?.is_none() {
        return Err(ApiError::unauthorized());
    }

    state.sessions.revoke(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
