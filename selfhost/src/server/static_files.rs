//! Static asset serving

use std::path::{Component, Path, PathBuf};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::filesys::file::File;
use crate::storage::layout::StorageLayout;

pub const HTML: &str = "text/html";
pub const JAVASCRIPT: &str = "application/javascript";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type by file extension; unknown extensions are binary
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") => HTML,
        Some("js") => JAVASCRIPT,
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => OCTET_STREAM,
    }
}

/// Map a request path onto the asset directory.
///
/// Trailing slashes are ignored. `/` and extensionless paths map to the
/// index document so client-side routes load the app. Paths that try to
/// climb out of the asset directory resolve to `None`.
pub fn resolve(layout: &StorageLayout, request_path: &str) -> Option<PathBuf> {
    let index = layout.index_file().path().to_path_buf();
    let relative = request_path.trim_end_matches('/').trim_start_matches('/');
    if relative.is_empty() {
        return Some(index);
    }

    let relative = Path::new(relative);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let candidate = layout.app_dir.join(relative);
    if candidate.extension().is_none() {
        return Some(index);
    }
    Some(candidate)
}

/// Read a file fully and answer with it, or 404
pub async fn serve_file(file: &File) -> Response {
    match file.read_bytes().await {
        Ok(data) => ([(header::CONTENT_TYPE, content_type(file.path()))], data).into_response(),
        Err(e) => {
            debug!("Not serving {:?}: {}", file.path(), e);
            not_found()
        }
    }
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
