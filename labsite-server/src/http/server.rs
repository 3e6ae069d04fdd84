//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing, timeout, and body-limit middleware
//! - Static serving of the upload directory
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServerConfig;
use crate::db::{
    ConnectionProvider, DatabaseProbe, MemberStore, MemoryStore, NewsStore, PgMemberRepo,
    PgNewsRepo, PgProbe,
};
use crate::storage::{StorageError, UploadStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub news: Arc<dyn NewsStore>,
    pub members: Arc<dyn MemberStore>,
    pub probe: Arc<dyn DatabaseProbe>,
    pub uploads: UploadStore,
}

impl AppState {
    /// Postgres repositories sharing one connection provider.
    pub fn postgres(provider: Arc<dyn ConnectionProvider>, uploads: UploadStore) -> Self {
        Self {
            news: Arc::new(PgNewsRepo::new(provider.clone())),
            members: Arc::new(PgMemberRepo::new(provider.clone())),
            probe: Arc::new(PgProbe::new(provider)),
            uploads,
        }
    }

    /// Everything kept in process memory.
    pub fn in_memory(uploads: UploadStore) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            news: store.clone(),
            members: store.clone(),
            probe: store,
            uploads,
        }
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mount = format!("/{}", state.uploads.public_path());
    let upload_dir = ServeDir::new(state.uploads.root());
    tracing::info!(
        path = %state.uploads.root().display(),
        mount = %mount,
        "Serving uploads"
    );

    Router::new()
        .merge(routes::diagnostics::router())
        .merge(routes::news::router())
        .merge(routes::members::router())
        .nest_service(&mount, upload_dir)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(timeout_layer(Duration::from_secs(config.request_timeout_secs)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Requests exceeding `timeout` are answered with 408.
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Run the HTTP server.
///
/// Creates the upload directory, then serves until a shutdown signal.
///
/// # Example
///
/// ```ignore
/// let provider = provider_from_config(&database_url, &DatabaseConfig::default())?;
/// let state = AppState::postgres(provider, UploadStore::new(&StorageConfig::default()));
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    state.uploads.ensure_root().await?;

    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
