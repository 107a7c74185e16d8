//! HTTP server entry point.

use tokio::net::TcpListener;
use tracing::info;

use super::handlers::AppState;
use super::router::create_router;
use crate::config::ServerConfig;
use crate::Result;

/// Bind and serve the API until the process is stopped.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "listening");

    let router = create_router(state);
    axum::serve(listener, router).await?;
    Ok(())
}
