//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::InstallerError;
use crate::filesys::file::File;
use crate::installer::request::InstallRequest;
use crate::server::state::ServerState;
use crate::server::static_files::{not_found, resolve, serve_file, JAVASCRIPT};

/// Install handler
///
/// The install runs on its own task so it completes even if the client
/// goes away mid-request.
pub async fn install_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<impl IntoResponse, InstallerError> {
    let request = InstallRequest::from_slice(&body)?;
    let installer = state.installer.clone();
    let outcome = tokio::spawn(async move { installer.install(request).await })
        .await
        .map_err(|e| InstallerError::ServerError(e.to_string()))??;
    Ok(Json(outcome))
}

/// Runtime config module handler
pub async fn config_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.config_store.script().await {
        Some(script) => ([(header::CONTENT_TYPE, JAVASCRIPT)], script).into_response(),
        None => not_found(),
    }
}

/// Everything else comes from the asset directory
pub async fn static_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    match resolve(&state.layout, uri.path()) {
        Some(path) => serve_file(&File::new(path)).await,
        None => not_found(),
    }
}
