//! HTTP API built on axum.
//!
//! - `handlers` - route handlers and request/response bodies
//! - `error` - JSON error responses

mod error;
mod handlers;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use std::any::Any as PanicPayload;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use self::error::ApiError;

use crate::backend::BackendSelector;
use crate::config::Config;
use crate::constants::MAX_BODY_SIZE;
use crate::history::HistoryStore;
use crate::service::EmailService;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmailService>,
    pub history: HistoryStore,
    /// Default number of records for the history listing
    pub page_size: u32,
}

pub fn router(state: AppState) -> Router {
    with_middleware(
        Router::new()
            .route("/api/generate", post(handlers::generate))
            .route("/api/history", get(handlers::list_history))
            .route("/api/history/delete/{id}", delete(handlers::delete_history))
            .route("/api/history/clear", delete(handlers::clear_history))
            .route("/api/tones", get(handlers::list_tones))
            .route("/health", get(handlers::health))
            .fallback(handlers::not_found)
            .with_state(state),
    )
}

fn with_middleware(router: Router) -> Router {
    router
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
}

fn panic_response(err: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!("Handler panicked: {}", detail);
    ApiError::Internal.into_response()
}

/// Open the history store, build the backend, and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    config.ensure_dirs()?;
    let db_path = config.database_path()?;
    let history = HistoryStore::open(&db_path)
        .await
        .with_context(|| format!("Failed to open history database: {}", db_path.display()))?;
    tracing::info!(
        "History database at {} ({} records)",
        db_path.display(),
        history.count().await?
    );

    let backend = BackendSelector::new(&config.ai)?;
    let service = Arc::new(EmailService::new(backend, Some(history.clone())));

    let state = AppState {
        service,
        history,
        page_size: config.history.page_size,
    };

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
