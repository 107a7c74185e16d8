//! HTTP handlers for STASH.

pub mod app;
pub mod auth;
pub mod files;
pub mod users;

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::Sessions;
use crate::queue::JobProducer;
use crate::store::{BlobStore, Database, KeyValueStore};

/// Application state shared across handlers.
///
/// Every field is a cheap-to-clone handle on a store opened at process
/// start; handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub kv: Arc<dyn KeyValueStore>,
    pub blobs: BlobStore,
    pub queue: JobProducer,
    pub sessions: Sessions,
}

impl AppState {
    /// Assemble the state from its store handles.
    pub fn new(
        db: Database,
        kv: Arc<dyn KeyValueStore>,
        blobs: BlobStore,
        queue: JobProducer,
    ) -> Self {
        let sessions = Sessions::new(kv.clone());
        Self {
            db,
            kv,
            blobs,
            queue,
            sessions,
        }
    }
}

/// Session token header.
const TOKEN_HEADER: &str = "X-Token";

/// Extract the session token from request headers.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok())
}
