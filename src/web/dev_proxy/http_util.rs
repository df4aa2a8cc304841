//! Usage: Low-level HTTP helpers for dev server proxying (headers, target urls, response building).

use crate::web::errors::{error_response, BRIDGE_RESPONSE_BUILD_ERROR};
use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::Response,
};

pub(super) fn strip_hop_headers(headers: &mut HeaderMap) {
    headers.remove(header::CONNECTION);
    headers.remove("keep-alive");
    headers.remove("proxy-connection");
    headers.remove(header::PROXY_AUTHENTICATE);
    headers.remove(header::PROXY_AUTHORIZATION);
    headers.remove(header::TE);
    headers.remove(header::TRAILER);
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::UPGRADE);
}

/// Joins the dev server base path with the forwarded path and carries the query over.
pub(super) fn build_target_url(
    base_url: &reqwest::Url,
    forwarded_path: &str,
    query: Option<&str>,
) -> Result<reqwest::Url, String> {
    let mut url = base_url.clone();

    let base_path = url.path().trim_end_matches('/');
    let mut combined_path = String::with_capacity(base_path.len() + forwarded_path.len() + 1);
    combined_path.push_str(base_path);
    if !forwarded_path.starts_with('/') {
        combined_path.push('/');
    }
    combined_path.push_str(forwarded_path);
    if combined_path.is_empty() {
        combined_path.push('/');
    }

    url.set_path(&combined_path);
    url.set_query(query);
    url.set_fragment(None);
    Ok(url)
}

/// Same target as [`build_target_url`], on the matching websocket scheme.
pub(super) fn build_websocket_url(
    base_url: &reqwest::Url,
    forwarded_path: &str,
    query: Option<&str>,
) -> Result<reqwest::Url, String> {
    let mut url = build_target_url(base_url, forwarded_path, query)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(format!("unsupported dev server scheme for websocket: {other}")),
    };
    url.set_scheme(scheme)
        .map_err(|_| format!("failed to switch {url} to {scheme}"))?;
    Ok(url)
}

pub(super) fn requested_subprotocols(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SEC_WEBSOCKET_PROTOCOL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn build_response(status: StatusCode, headers: &HeaderMap, body: Body) -> Response {
    let mut builder = Response::builder().status(status);
    for (k, v) in headers.iter() {
        builder = builder.header(k, v);
    }

    match builder.body(body) {
        Ok(r) => r,
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            BRIDGE_RESPONSE_BUILD_ERROR,
            format!("failed to build proxied response: {err}"),
        ),
    }
}
