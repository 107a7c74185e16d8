//! User registration and profile handlers.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::info;

use crate::auth::{authenticate, hash_password};
use crate::queue::Job;
use crate::user::{NewUser, UserRepository};
use crate::web::dto::{RegisterRequest, UserResponse};
use crate::web::error::ApiError;
use crate::web::handlers::{session_token, AppState};

/// POST /users - register a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = body
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing email"))?;
    let password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing password"))?;

    let users = UserRepository::new(state.db.pool());
    if users.get_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("Already exist"));
    }

    let hash = hash_password(&password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::internal()
    })?;
    let user = users.create(&NewUser::new(email, hash)).await?;

    info!(user_id = user.id, "user registered");
    state.queue.enqueue(Job::Welcome { user_id: user.id });

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// GET /users/me - the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let users = UserRepository::new(state.db.pool());
    let user_id = authenticate(&state.sessions, &users, session_token(&headers)).await?;

    // authenticate() just confirmed the row exists
    let user = users
        .get_by_id(user_id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
    }))
}
