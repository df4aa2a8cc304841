//! Usage: Options accepted by the web server + the per-server state shared by handlers.

use super::runtime_config::{ConfigEnv, RuntimeConfig};
use crate::infra::settings::{DEFAULT_MAX_PROXY_BODY_BYTES, DEFAULT_STOP_TIMEOUT_SECONDS};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEV_SERVER_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the UI bundle comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSource {
    /// Live-reloading asset server (e.g. `http://localhost:5173`).
    DevServer(String),
    /// Directory holding the built renderer (`index.html` + assets).
    Static(PathBuf),
}

impl UiSource {
    /// A present, non-blank dev server URL wins over the static directory.
    pub fn resolve(dev_server_url: Option<&str>, static_dir: PathBuf) -> Self {
        match dev_server_url.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => Self::DevServer(url.to_string()),
            None => Self::Static(static_dir),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::DevServer(_) => "dev_server",
            Self::Static(_) => "static",
        }
    }
}

#[derive(Clone)]
pub struct WebServerOptions {
    /// Port of the local API the UI talks to (`GOOSE_PORT`).
    pub api_port: u16,
    pub working_dir: PathBuf,
    pub secret_key: String,
    pub ui_source: UiSource,
    pub env: ConfigEnv,
    pub stop_timeout: Duration,
    pub max_proxy_body_bytes: usize,
}

impl WebServerOptions {
    /// Snapshots the process environment for the injected feature flags.
    pub fn new(api_port: u16, working_dir: PathBuf, secret_key: String, ui_source: UiSource) -> Self {
        Self {
            api_port,
            working_dir,
            secret_key,
            ui_source,
            env: ConfigEnv::from_env(),
            stop_timeout: Duration::from_secs(DEFAULT_STOP_TIMEOUT_SECONDS as u64),
            max_proxy_body_bytes: DEFAULT_MAX_PROXY_BODY_BYTES,
        }
    }
}

pub(crate) enum UiMode {
    DevServer(reqwest::Url),
    Static(PathBuf),
}

pub(crate) struct BridgeState {
    pub(crate) config: RuntimeConfig,
    pub(crate) ui: UiMode,
    pub(crate) http: reqwest::Client,
    pub(crate) max_proxy_body_bytes: usize,
}

pub(crate) type SharedState = Arc<BridgeState>;

impl BridgeState {
    pub(crate) fn new(options: &WebServerOptions) -> Result<Self, String> {
        let ui = match &options.ui_source {
            UiSource::DevServer(url) => UiMode::DevServer(
                reqwest::Url::parse(url)
                    .map_err(|e| format!("invalid dev server url {url}: {e}"))?,
            ),
            UiSource::Static(dir) => UiMode::Static(dir.clone()),
        };

        // The proxy hands redirects back to the browser untouched.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(DEV_SERVER_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| format!("failed to build http client: {e}"))?;

        Ok(Self {
            config: RuntimeConfig::new(
                options.api_port,
                &options.working_dir,
                &options.secret_key,
                &options.env,
            ),
            ui,
            http,
            max_proxy_body_bytes: options.max_proxy_body_bytes,
        })
    }

    pub(crate) fn dev_server_url(&self) -> Option<&reqwest::Url> {
        match &self.ui {
            UiMode::DevServer(url) => Some(url),
            UiMode::Static(_) => None,
        }
    }

    pub(crate) fn renderer_dir(&self) -> Option<&PathBuf> {
        match &self.ui {
            UiMode::Static(dir) => Some(dir),
            UiMode::DevServer(_) => None,
        }
    }
}
