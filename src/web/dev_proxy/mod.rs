//! Usage: Development mode (config-injected root page + reverse proxy to the dev server).

mod http_util;
mod websocket;

use super::errors::{
    error_response, text_error, BRIDGE_DEV_SERVER_UNREACHABLE, BRIDGE_INVALID_TARGET_URL,
    BRIDGE_REQUEST_BODY_INVALID, BRIDGE_REQUEST_BODY_TOO_LARGE,
};
use super::inject::inject_config_script_tag;
use super::state::SharedState;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State, WebSocketUpgrade},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use http_util::{build_response, build_target_url, strip_hop_headers};
use std::error::Error as _;

pub(super) const DEV_INDEX_ERROR_MESSAGE: &str = "Error loading development server";

/// `GET /`: the dev server's root page with the config script tag spliced in.
pub(crate) async fn dev_root(
    State(state): State<SharedState>,
    ws: Option<WebSocketUpgrade>,
    req: Request,
) -> Response {
    if ws.is_some() {
        return proxy(State(state), ws, req).await;
    }

    let Some(base_url) = state.dev_server_url() else {
        return text_error(StatusCode::NOT_FOUND, "Not Found");
    };

    match fetch_text(&state.http, base_url).await {
        Ok(html) => Html(inject_config_script_tag(&html)).into_response(),
        Err(err) => {
            tracing::error!(dev_server = %base_url, "error fetching from dev server: {}", err);
            text_error(StatusCode::INTERNAL_SERVER_ERROR, DEV_INDEX_ERROR_MESSAGE)
        }
    }
}

async fn fetch_text(client: &reqwest::Client, url: &reqwest::Url) -> Result<String, String> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;
    resp.text()
        .await
        .map_err(|e| format!("failed to read body: {e}"))
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = err.source();
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

/// Everything else: forwarded to the dev server with path, query, method and body intact.
pub(crate) async fn proxy(
    State(state): State<SharedState>,
    ws: Option<WebSocketUpgrade>,
    req: Request,
) -> Response {
    let Some(base_url) = state.dev_server_url() else {
        return text_error(StatusCode::NOT_FOUND, "Not Found");
    };

    let (parts, body) = req.into_parts();
    if let Some(ws) = ws {
        return websocket::relay_upgrade(ws, base_url, &parts.uri, &parts.headers).await;
    }

    let target = match build_target_url(base_url, parts.uri.path(), parts.uri.query()) {
        Ok(url) => url,
        Err(err) => return error_response(StatusCode::BAD_GATEWAY, BRIDGE_INVALID_TARGET_URL, err),
    };

    let body = match to_bytes(body, state.max_proxy_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) if is_length_limit(&err) => {
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                BRIDGE_REQUEST_BODY_TOO_LARGE,
                format!(
                    "request body rejected (limit={} bytes): {err}",
                    state.max_proxy_body_bytes
                ),
            );
        }
        Err(err) => {
            tracing::warn!(method = %parts.method, "failed to read request body: {}", err);
            return error_response(
                StatusCode::BAD_REQUEST,
                BRIDGE_REQUEST_BODY_INVALID,
                format!("failed to read request body: {err}"),
            );
        }
    };

    let mut headers = parts.headers;
    strip_hop_headers(&mut headers);
    // reqwest derives Host from the target, which is what the dev server expects.
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    let mut upstream_req = state
        .http
        .request(parts.method.clone(), target.clone())
        .headers(headers);
    if !body.is_empty() {
        upstream_req = upstream_req.body(body);
    }

    let upstream = match upstream_req.send().await {
        Ok(resp) => resp,
        Err(err) => {
            tracing::warn!(
                method = %parts.method,
                target = %target,
                "dev server proxy request failed: {}",
                err
            );
            return error_response(
                StatusCode::BAD_GATEWAY,
                BRIDGE_DEV_SERVER_UNREACHABLE,
                format!("failed to reach dev server at {target}: {err}"),
            );
        }
    };

    let status = upstream.status();
    let mut resp_headers = upstream.headers().clone();
    strip_hop_headers(&mut resp_headers);
    build_response(
        status,
        &resp_headers,
        Body::from_stream(upstream.bytes_stream()),
    )
}
