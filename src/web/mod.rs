//! Usage: Local web bridge serving the desktop UI to an ordinary browser.
//!
//! Two modes share one route table: a dev server proxy (config script tag spliced into the
//! dev root page) and static renderer serving (config inlined into `index.html`). Both expose
//! `/search` and `/goose-config.js`.

mod desktop_bridge;
mod dev_proxy;
pub(crate) mod errors;
mod inject;
mod manager;
pub(crate) mod port;
mod router;
pub mod runtime_config;
mod search;
mod state;
mod static_ui;

pub use manager::{WebServerManager, WebServerStatus};
pub use port::find_available_port;
pub use runtime_config::{ConfigEnv, RuntimeConfig};
pub use state::{UiSource, WebServerOptions};

use crate::app::app_state::WebServerState;
use crate::app::cleanup::stop_web_server_best_effort;
use crate::shared::mutex_ext::MutexExt;
use std::sync::OnceLock;

static WEB_SERVER: OnceLock<WebServerState> = OnceLock::new();

fn global_state() -> &'static WebServerState {
    WEB_SERVER.get_or_init(WebServerState::default)
}

/// Starts the process-wide bridge (or reports the one already running) and returns its port.
pub fn start_web_server(options: WebServerOptions) -> Result<u16, String> {
    let status = global_state().0.lock_or_recover().start(options)?;
    status
        .port
        .ok_or_else(|| "web server started without a port".to_string())
}

pub async fn stop_web_server() {
    stop_web_server_best_effort(global_state()).await;
}

pub fn is_web_server_running() -> bool {
    global_state().0.lock_or_recover().is_running()
}

pub fn web_server_status() -> WebServerStatus {
    global_state().0.lock_or_recover().status()
}
