//! Health endpoint for the deployment platform
//!
//! - `GET /` → `200 text/plain` "XAUUSD Analysis Service - Running"
//! - anything else → `404`
//!
//! No state, no authentication. The server runs on its own task for the
//! lifetime of the process and never talks to the analysis pipeline.

use anyhow::{Context, Result};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::defaults::HEALTH_BODY;

async fn health() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], HEALTH_BODY)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the health router
pub fn create_app() -> Router {
    Router::new()
        .route("/", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

/// Bind the listener up front so a port already in use fails startup.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind health server to {addr}"))?;
    info!("✓ Health server listening on {}", addr);
    Ok(listener)
}

/// Serve until `cancel` fires.
pub async fn serve(listener: TcpListener, cancel: CancellationToken) -> Result<()> {
    axum::serve(listener, create_app())
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            info!("[HealthServer] Received shutdown signal");
        })
        .await
        .context("Health server error")
}
