//! Usage: WebSocket relay to the dev server (hot module reload channel).

use super::http_util::{build_websocket_url, requested_subprotocols};
use crate::web::errors::{
    error_response, BRIDGE_DEV_SERVER_UNREACHABLE, BRIDGE_INVALID_TARGET_URL,
};
use axum::{
    extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_tungstenite::tungstenite::{
    client::IntoClientRequest,
    protocol::{frame::coding::CloseCode, CloseFrame as UpstreamCloseFrame},
    Message as UpstreamMessage,
};

type UpstreamSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The dev server handshake completes first so the browser is offered exactly the subprotocol
/// the dev server selected (or none).
pub(super) async fn relay_upgrade(
    ws: WebSocketUpgrade,
    base_url: &reqwest::Url,
    uri: &Uri,
    headers: &HeaderMap,
) -> Response {
    let target = match build_websocket_url(base_url, uri.path(), uri.query()) {
        Ok(url) => url,
        Err(err) => {
            return error_response(StatusCode::BAD_GATEWAY, BRIDGE_INVALID_TARGET_URL, err);
        }
    };

    let protocols = requested_subprotocols(headers);
    let (upstream, selected) = match connect_upstream(&target, &protocols).await {
        Ok(connected) => connected,
        Err(err) => {
            tracing::warn!(target = %target, "websocket relay connect failed: {}", err);
            return error_response(StatusCode::BAD_GATEWAY, BRIDGE_DEV_SERVER_UNREACHABLE, err);
        }
    };

    let ws = match selected {
        Some(protocol) => ws.protocols([protocol]),
        None => ws,
    };

    ws.on_upgrade(move |socket| async move {
        tracing::debug!(target = %target, "websocket relay opened");
        match relay(socket, upstream).await {
            Ok(()) => tracing::debug!(target = %target, "websocket relay closed"),
            Err(err) => tracing::warn!(target = %target, "websocket relay ended: {}", err),
        }
    })
}

async fn connect_upstream(
    target: &reqwest::Url,
    protocols: &[String],
) -> Result<(UpstreamSocket, Option<String>), String> {
    let mut request = target
        .as_str()
        .into_client_request()
        .map_err(|e| format!("invalid websocket target {target}: {e}"))?;
    if !protocols.is_empty() {
        let value = HeaderValue::from_str(&protocols.join(", "))
            .map_err(|e| format!("invalid websocket subprotocol list: {e}"))?;
        request
            .headers_mut()
            .insert(header::SEC_WEBSOCKET_PROTOCOL, value);
    }

    let (upstream, response) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|e| format!("failed to connect to {target}: {e}"))?;
    let selected = response
        .headers()
        .get(header::SEC_WEBSOCKET_PROTOCOL)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    Ok((upstream, selected))
}

async fn relay(client: WebSocket, upstream: UpstreamSocket) -> Result<(), String> {
    let (mut upstream_tx, mut upstream_rx) = upstream.split();
    let (mut client_tx, mut client_rx) = client.split();

    let client_to_upstream = async move {
        while let Some(msg) = client_rx.next().await {
            let msg = msg.map_err(|e| format!("client websocket error: {e}"))?;
            let closing = matches!(msg, Message::Close(_));
            upstream_tx
                .send(to_upstream_message(msg))
                .await
                .map_err(|e| format!("failed to forward to dev server: {e}"))?;
            if closing {
                break;
            }
        }
        Ok::<(), String>(())
    };

    let upstream_to_client = async move {
        while let Some(msg) = upstream_rx.next().await {
            let msg = msg.map_err(|e| format!("dev server websocket error: {e}"))?;
            let Some(msg) = to_client_message(msg) else {
                continue;
            };
            let closing = matches!(msg, Message::Close(_));
            client_tx
                .send(msg)
                .await
                .map_err(|e| format!("failed to forward to browser: {e}"))?;
            if closing {
                break;
            }
        }
        Ok::<(), String>(())
    };

    tokio::select! {
        result = client_to_upstream => result,
        result = upstream_to_client => result,
    }
}

fn to_upstream_message(msg: Message) -> UpstreamMessage {
    match msg {
        Message::Text(text) => UpstreamMessage::Text(text.into()),
        Message::Binary(data) => UpstreamMessage::Binary(data.into()),
        Message::Ping(data) => UpstreamMessage::Ping(data.into()),
        Message::Pong(data) => UpstreamMessage::Pong(data.into()),
        Message::Close(frame) => UpstreamMessage::Close(frame.map(|f| UpstreamCloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason,
        })),
    }
}

/// Raw frames never surface from a read; they have no browser-side counterpart.
fn to_client_message(msg: UpstreamMessage) -> Option<Message> {
    match msg {
        UpstreamMessage::Text(text) => Some(Message::Text(text.as_str().to_owned())),
        UpstreamMessage::Binary(data) => Some(Message::Binary(data.as_slice().to_vec())),
        UpstreamMessage::Ping(data) => Some(Message::Ping(data.as_slice().to_vec())),
        UpstreamMessage::Pong(data) => Some(Message::Pong(data.as_slice().to_vec())),
        UpstreamMessage::Close(frame) => Some(Message::Close(frame.map(|f| CloseFrame {
            code: u16::from(f.code),
            reason: f.reason,
        }))),
        UpstreamMessage::Frame(_) => None,
    }
}
