//! Route table for the STASH API.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{app, auth, files, users, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(app::status))
        .route("/stats", get(app::stats))
        .route("/users", post(users::register))
        .route("/users/me", get(users::me))
        .route("/connect", get(auth::connect))
        .route("/disconnect", get(auth::disconnect))
        .route("/files", post(files::upload).get(files::index))
        .route("/files/:id", get(files::show))
        .route("/files/:id/publish", put(files::publish))
        .route("/files/:id/unpublish", put(files::unpublish))
        .route("/files/:id/data", get(files::data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
