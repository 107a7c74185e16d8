//! Health and statistics handlers.

use axum::extract::State;
use axum::Json;

use crate::web::dto::{StatsResponse, StatusResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /status - liveness of the backing stores.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        redis: state.kv.is_alive().await,
        db: state.db.is_alive().await,
    })
}

/// GET /stats - user and file counts.
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let users = state.db.count_users().await?;
    let files = state.db.count_files().await?;
    Ok(Json(StatsResponse { users, files }))
}
