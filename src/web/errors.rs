//! Usage: Standardized web bridge error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub(crate) const BRIDGE_DEV_SERVER_UNREACHABLE: &str = "BRIDGE_DEV_SERVER_UNREACHABLE";
pub(crate) const BRIDGE_INVALID_TARGET_URL: &str = "BRIDGE_INVALID_TARGET_URL";
pub(crate) const BRIDGE_REQUEST_BODY_INVALID: &str = "BRIDGE_REQUEST_BODY_INVALID";
pub(crate) const BRIDGE_REQUEST_BODY_TOO_LARGE: &str = "BRIDGE_REQUEST_BODY_TOO_LARGE";
pub(crate) const BRIDGE_RESPONSE_BUILD_ERROR: &str = "BRIDGE_RESPONSE_BUILD_ERROR";

#[derive(Debug, Serialize)]
struct BridgeErrorResponse {
    error_code: &'static str,
    message: String,
}

pub(crate) fn error_response(status: StatusCode, error_code: &'static str, message: String) -> Response {
    let payload = BridgeErrorResponse {
        error_code,
        message,
    };
    (status, Json(payload)).into_response()
}

/// Plain-text failure used by the HTML entry points.
pub(crate) fn text_error(status: StatusCode, message: &'static str) -> Response {
    (status, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn error_response_serializes_code_and_message() {
        let resp = error_response(
            StatusCode::BAD_GATEWAY,
            BRIDGE_DEV_SERVER_UNREACHABLE,
            "connection refused".to_string(),
        );
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["error_code"], "BRIDGE_DEV_SERVER_UNREACHABLE");
        assert_eq!(value["message"], "connection refused");
    }
}
