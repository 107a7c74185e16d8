//! Shared helpers for API end-to-end tests.
//!
//! Builds a full application on in-memory stores: in-memory SQLite, the
//! in-process key-value store, and a temp-dir blob store.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tempfile::TempDir;

use stash::queue::{self, JobConsumer};
use stash::store::{BlobStore, Database, MemoryStore};
use stash::thumbnail::ThumbnailWorker;
use stash::web::{create_router, AppState};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    /// Present when the test drives the worker by hand instead of the
    /// background task.
    pub consumer: Option<JobConsumer>,
    pub worker: ThumbnailWorker,
    _blob_dir: TempDir,
}

async fn build(background_worker: bool) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("failed to open test database");
    let blob_dir = TempDir::new().expect("failed to create blob dir");
    let blobs = BlobStore::new(blob_dir.path()).expect("failed to create blob store");

    let (producer, consumer) = queue::channel();
    let worker = ThumbnailWorker::new(db.pool().clone(), blobs.clone());

    let state = AppState::new(db, Arc::new(MemoryStore::new()), blobs, producer);
    let server =
        TestServer::new(create_router(state.clone())).expect("failed to create test server");

    let consumer = if background_worker {
        let background = worker.clone();
        tokio::spawn(consumer.run(move |job| {
            let worker = background.clone();
            async move { worker.handle(job).await }
        }));
        None
    } else {
        Some(consumer)
    };

    TestApp {
        server,
        state,
        consumer,
        worker,
        _blob_dir: blob_dir,
    }
}

/// Application with the worker task running in the background.
pub async fn spawn_app() -> TestApp {
    build(true).await
}

/// Application whose jobs the test consumes and dispatches itself.
pub async fn spawn_app_manual_worker() -> TestApp {
    build(false).await
}

/// Register a user and return the response body.
pub async fn register(server: &TestServer, email: &str, password: &str) -> Value {
    server
        .post("/users")
        .json(&json!({ "email": email, "password": password }))
        .await
        .json::<Value>()
}

/// Log in with Basic credentials and return the session token.
pub async fn connect(server: &TestServer, email: &str, password: &str) -> String {
    let credentials = BASE64.encode(format!("{email}:{password}"));
    let response = server
        .get("/connect")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Basic {credentials}")).unwrap(),
        )
        .await;

    response.json::<Value>()["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

/// Register and log in one user, returning the token.
pub async fn register_and_connect(server: &TestServer, email: &str, password: &str) -> String {
    let created = register(server, email, password).await;
    assert!(created.get("id").is_some(), "registration failed: {created}");
    connect(server, email, password).await
}

/// Session token header pair.
pub fn x_token(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-token"),
        HeaderValue::from_str(token).unwrap(),
    )
}
