//! HTTP server setup

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::InstallerError;
use crate::server::handlers::{config_handler, install_handler, static_handler};
use crate::server::state::ServerState;

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Other methods on these paths are plain static requests
        .route("/install", post(install_handler).fallback(static_handler))
        .route("/config.js", get(config_handler).fallback(static_handler))
        .fallback(static_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server. Returns the bound address and the serving task.
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, JoinHandle<Result<(), InstallerError>>), InstallerError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| InstallerError::ServerError(format!("Unable to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    info!("Server listening on {}", local_addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| InstallerError::ServerError(e.to_string()))
    });

    Ok((local_addr, handle))
}
