//! Usage: Route table for the web bridge (shared routes + dev/static mode routes + layers).

use super::dev_proxy;
use super::inject::CONFIG_SCRIPT_PATH;
use super::runtime_config::standalone_config_script;
use super::search::search;
use super::state::{SharedState, UiMode};
use super::static_ui;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

async fn config_script(State(state): State<SharedState>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        standalone_config_script(&state.config),
    )
        .into_response()
}

/// Any origin, with credentials. A literal `*` cannot be combined with credentials, so the
/// request origin is echoed back instead.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub(crate) fn build_router(state: SharedState) -> Router {
    let router: Router<SharedState> = match &state.ui {
        // Non-GET requests on the fixed paths still belong to the dev server.
        UiMode::DevServer(_) => Router::new()
            .route("/search", get(search).fallback(dev_proxy::proxy))
            .route(
                CONFIG_SCRIPT_PATH,
                get(config_script).fallback(dev_proxy::proxy),
            )
            .route("/", get(dev_proxy::dev_root).fallback(dev_proxy::proxy))
            .fallback(dev_proxy::proxy),
        UiMode::Static(dir) => Router::new()
            .route("/search", get(search))
            .route(CONFIG_SCRIPT_PATH, get(config_script))
            .route("/", get(static_ui::index))
            .route("/index.html", get(static_ui::index))
            .fallback_service(static_ui::static_service(state.clone(), dir)),
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
