//! Usage: Static renderer mode (built assets + config-injected `index.html` as SPA fallback).

use super::errors::text_error;
use super::inject::inject_inline_config;
use super::state::SharedState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, MethodRouter},
};
use std::path::Path;
use tower_http::services::ServeDir;

const INDEX_FILE: &str = "index.html";
const INDEX_ERROR_MESSAGE: &str = "Error loading application";

/// Read on every request so a rebuilt renderer is picked up without a restart.
pub(crate) async fn index(State(state): State<SharedState>) -> Response {
    let Some(dir) = state.renderer_dir() else {
        return text_error(StatusCode::NOT_FOUND, "Not Found");
    };

    let index_path = dir.join(INDEX_FILE);
    match tokio::fs::read_to_string(&index_path).await {
        Ok(html) => Html(inject_inline_config(&html, &state.config)).into_response(),
        Err(err) => {
            tracing::error!(path = %index_path.display(), "error serving index.html: {}", err);
            text_error(StatusCode::INTERNAL_SERVER_ERROR, INDEX_ERROR_MESSAGE)
        }
    }
}

/// Files under `dir` as-is; directories and misses fall through to [`index`].
pub(crate) fn static_service(state: SharedState, dir: &Path) -> ServeDir<MethodRouter> {
    ServeDir::new(dir)
        .append_index_html_on_directories(false)
        .fallback(get(index).with_state(state))
}
