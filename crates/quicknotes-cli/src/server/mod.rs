//! HTTP transport for the note store
//!
//! Maps the REST routes onto `NoteStore` operations. The store is shared by
//! all requests behind one async mutex, so mutations are serialized.

pub mod error;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, put};
use axum::Router;
use quicknotes_core::{Config, Note, NoteStore};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::{ApiError, ErrorBody};

/// Message sent with every successful delete
pub const DELETED_MESSAGE: &str = "Note deleted successfully";

/// Body of a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_note: Note,
}

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<NoteStore>>,
}

impl AppState {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        .route(
            "/notes",
            get(routes::list_notes).post(routes::create_note),
        )
        .route(
            "/notes/{id}",
            put(routes::update_note).delete(routes::delete_note),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The browser frontend is served from a different origin
        .layer(CorsLayer::permissive())
}

/// Open the store and serve until interrupted
pub async fn start_server(config: &Config) -> Result<()> {
    let store = NoteStore::open_with_config(config);
    info!(
        snapshot = %config.snapshot_path.display(),
        notes = store.len(),
        next_id = store.next_id(),
        "Note store ready"
    );

    let app = router(AppState::new(store));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Quicknotes listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Quicknotes stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, run until the process is killed
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
