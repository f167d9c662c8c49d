//! HTTP service
//!
//! `POST /order` sequences a JSON track list, `POST /upload` analyzes
//! uploaded audio files, `GET /health` reports liveness. CORS is open to
//! every origin.

pub mod error;
pub mod handlers;
pub mod health;

pub use error::ApiError;

use crate::config::ServerSettings;
use crate::error::{DjorderError, Result};
use crate::pipeline::{configure_thread_pool, BatchAnalyzer};
use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: BatchAnalyzer,
    /// Largest track list /order will sequence
    pub max_tracks: usize,
}

impl AppState {
    pub fn new(analyzer: BatchAnalyzer, max_tracks: usize) -> Self {
        Self {
            analyzer,
            max_tracks,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/order", post(handlers::order))
        .route("/upload", post(handlers::upload))
        .merge(health::health_routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn run(settings: ServerSettings) -> Result<()> {
    configure_thread_pool(settings.analysis.threads)?;

    let state = AppState::new(
        BatchAnalyzer::from_settings(&settings.analysis),
        settings.max_tracks,
    );
    let app = build_router(state, settings.max_upload_bytes);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DjorderError::ServerError(format!("Failed to bind {}: {}", addr, e)))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| DjorderError::ServerError(e.to_string()))?;

    Ok(())
}
