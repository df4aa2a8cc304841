//! Usage: `/search?q=` landing page that seeds a chat query and redirects into the UI.

use super::inject::CONFIG_SCRIPT_PATH;
use super::runtime_config::script_safe_json;
use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

const TITLE_QUERY_MAX_CHARS: usize = 50;
const REDIRECT_DELAY_MS: u32 = 1500;
pub(crate) const AUTO_START_QUERY_KEY: &str = "autoStartQuery";
const MISSING_QUERY_MESSAGE: &str = "Query parameter \"q\" is required";

pub(crate) async fn search(Query(params): Query<Vec<(String, String)>>) -> Response {
    let query = params
        .into_iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty());

    let Some(query) = query else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": MISSING_QUERY_MESSAGE })),
        )
            .into_response();
    };

    tracing::info!("search request received with query: {}", query);

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        render_search_page(&query),
    )
        .into_response()
}

fn title_fragment(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(TITLE_QUERY_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn render_search_page(query: &str) -> String {
    let title = escape_html(&title_fragment(query));
    let shown = escape_html(query);
    let query_json = serde_json::to_string(query).unwrap_or_else(|_| "\"\"".to_string());
    let query_json = script_safe_json(&query_json);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Goose - Search: {title}</title>
    <script src="{CONFIG_SCRIPT_PATH}"></script>
    <style>
      body {{
        margin: 0;
        padding: 20px;
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
        background: #1a1a1a;
        color: #ffffff;
        display: flex;
        flex-direction: column;
        align-items: center;
        justify-content: center;
        min-height: 100vh;
      }}
      .loading {{ text-align: center; margin-bottom: 20px; }}
      .spinner {{
        border: 2px solid #333;
        border-top: 2px solid #fff;
        border-radius: 50%;
        width: 40px;
        height: 40px;
        animation: spin 1s linear infinite;
        margin: 0 auto 20px;
      }}
      @keyframes spin {{
        0% {{ transform: rotate(0deg); }}
        100% {{ transform: rotate(360deg); }}
      }}
      .query {{
        background: #2a2a2a;
        padding: 15px;
        border-radius: 8px;
        margin: 20px 0;
        font-family: monospace;
        word-break: break-word;
      }}
    </style>
</head>
<body>
    <div class="loading">
        <div class="spinner"></div>
        <h2>Starting Goose Chat...</h2>
        <div class="query">Query: "{shown}"</div>
        <p>Redirecting to chat interface...</p>
    </div>
    <script>
        sessionStorage.setItem('{AUTO_START_QUERY_KEY}', {query_json});
        setTimeout(() => {{
            window.location.href = '/';
        }}, {REDIRECT_DELAY_MS});
    </script>
</body>
</html>"#
    )
}
