//! Usage: Runtime configuration injected into the served UI (`window.gooseConfig` + bridge mock).

use super::desktop_bridge::DESKTOP_BRIDGE_SCRIPT;
use serde::Serialize;
use std::path::Path;

pub const API_HOST: &str = "http://127.0.0.1";

const ENV_DEFAULT_PROVIDER: &str = "GOOSE_DEFAULT_PROVIDER";
const ENV_DEFAULT_MODEL: &str = "GOOSE_DEFAULT_MODEL";
const ENV_ALLOWLIST_WARNING: &str = "GOOSE_ALLOWLIST_WARNING";
const ENV_BASE_URL_SHARE: &str = "GOOSE_BASE_URL_SHARE";
const ENV_VERSION: &str = "GOOSE_VERSION";

/// Environment-derived feature flags, captured once when the server starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEnv {
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    pub allowlist_warning: bool,
    pub base_url_share: Option<String>,
    pub version: Option<String>,
}

impl ConfigEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            default_provider: lookup(ENV_DEFAULT_PROVIDER),
            default_model: lookup(ENV_DEFAULT_MODEL),
            // Only the exact string "true" enables the warning.
            allowlist_warning: lookup(ENV_ALLOWLIST_WARNING).as_deref() == Some("true"),
            base_url_share: lookup(ENV_BASE_URL_SHARE),
            version: lookup(ENV_VERSION),
        }
    }
}

/// Field order is the key order the UI sees.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    #[serde(rename = "GOOSE_DEFAULT_PROVIDER", skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    #[serde(rename = "GOOSE_DEFAULT_MODEL", skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(rename = "GOOSE_API_HOST")]
    pub api_host: &'static str,
    #[serde(rename = "GOOSE_PORT")]
    pub api_port: u16,
    #[serde(rename = "GOOSE_WORKING_DIR")]
    pub working_dir: String,
    #[serde(rename = "GOOSE_ALLOWLIST_WARNING")]
    pub allowlist_warning: bool,
    #[serde(rename = "secretKey")]
    pub secret_key: String,
    #[serde(rename = "GOOSE_BASE_URL_SHARE", skip_serializing_if = "Option::is_none")]
    pub base_url_share: Option<String>,
    #[serde(rename = "GOOSE_VERSION", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl RuntimeConfig {
    pub fn new(api_port: u16, working_dir: &Path, secret_key: &str, env: &ConfigEnv) -> Self {
        Self {
            default_provider: env.default_provider.clone(),
            default_model: env.default_model.clone(),
            api_host: API_HOST,
            api_port,
            working_dir: working_dir.to_string_lossy().into_owned(),
            allowlist_warning: env.allowlist_warning,
            secret_key: secret_key.to_string(),
            base_url_share: env.base_url_share.clone(),
            version: env.version.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        script_safe_json(&json)
    }
}

/// JSON that can sit inside an inline `<script>` without closing it early.
pub(crate) fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn config_script(config: &RuntimeConfig) -> String {
    format!(
        "window.gooseConfig = {};\n\
         window.appConfig = {{\n  get: (key) => window.gooseConfig[key],\n  getAll: () => window.gooseConfig\n}};\n\
         {}",
        config.to_json(),
        DESKTOP_BRIDGE_SCRIPT
    )
}

/// Body of `/goose-config.js`.
pub fn standalone_config_script(config: &RuntimeConfig) -> String {
    let mut script = config_script(config);
    script.push_str("console.log('Goose config loaded for web version:', window.gooseConfig);\n");
    script
}

pub fn inline_config_block(config: &RuntimeConfig) -> String {
    format!("\n<script>\n{}</script>", config_script(config))
}
