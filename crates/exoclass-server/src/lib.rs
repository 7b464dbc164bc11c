//! HTTP surface for the exoplanet candidate classifier.
//!
//! Thin JSON layer over [`exoclass_ai::ModelHandle`]: validation happens
//! before any model access, an unloaded model degrades to 503 rather than
//! failing startup, and reload swaps the bundle in one step.

pub mod api;
pub mod config;
pub mod error;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use exoclass_ai::ModelHandle;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub model: ModelHandle,
    pub model_paths: Arc<Vec<PathBuf>>,
}

impl AppState {
    pub fn new(model: ModelHandle, model_paths: Vec<PathBuf>) -> Self {
        Self {
            model,
            model_paths: Arc::new(model_paths),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/predict", post(api::predict))
        .route("/predict/batch", post(api::predict_batch))
        .route("/model/info", get(api::model_info))
        .route("/model/reload", post(api::reload_model))
        .with_state(state)
}

/// Load the model, bind, and serve until SIGINT or SIGTERM.
///
/// A missing or broken model does not prevent startup.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(ModelHandle::new(), config.model_paths);

    let handle = state.model.clone();
    let paths = state.model_paths.clone();
    let loaded = tokio::task::spawn_blocking(move || handle.load_from(&paths))
        .await
        .map_err(std::io::Error::other)?;
    if loaded.is_err() {
        warn!("no model loaded; prediction endpoints return 503");
    }

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "exoclass server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("shutdown signal received (SIGINT)"),
        _ = terminate => info!("shutdown signal received (SIGTERM)"),
    }
}
