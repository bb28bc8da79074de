use crate::infra::AppState;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use std::path::{Component, Path, PathBuf};

/// Fallback route serving the employee/HR front-end from the configured
/// static directory. The API surface stays JSON; this is passthrough only.
pub(crate) async fn static_asset_endpoint(
    Extension(state): Extension<AppState>,
    uri: Uri,
) -> Response {
    let Some(full) = resolve(&state.static_dir, uri.path()) else {
        return not_found();
    };

    match tokio::fs::read(&full).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&full).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                bytes,
            )
                .into_response()
        }
        Err(_) => not_found(),
    }
}

/// Map a request path onto the static directory, refusing anything that
/// would escape it.
fn resolve(static_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    let relative = if trimmed.is_empty() {
        "index.html"
    } else {
        trimmed
    };

    let mut full = static_dir.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => full.push(part),
            _ => return None,
        }
    }
    Some(full)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}
