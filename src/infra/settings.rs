//! Usage: Optional bridge settings file (schema + read helpers + sanitizing).

use crate::shared::fs::read_optional_text;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_STOP_TIMEOUT_SECONDS: u32 = 3;
pub const DEFAULT_MAX_PROXY_BODY_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_RENDERER_NAME: &str = "main_window";
const MAX_STOP_TIMEOUT_SECONDS: u32 = 60;
const MIN_MAX_PROXY_BODY_BYTES: usize = 64 * 1024;
const MAX_MAX_PROXY_BODY_BYTES: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub schema_version: u32,
    // Live-reloading asset server; empty means serve the built renderer.
    pub dev_server_url: Option<String>,
    pub renderer_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub stop_timeout_seconds: u32,
    pub max_proxy_body_bytes: usize,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dev_server_url: None,
            renderer_dir: None,
            log_dir: None,
            stop_timeout_seconds: DEFAULT_STOP_TIMEOUT_SECONDS,
            max_proxy_body_bytes: DEFAULT_MAX_PROXY_BODY_BYTES,
        }
    }
}

fn sanitize_stop_timeout(settings: &mut BridgeSettings) -> bool {
    if settings.stop_timeout_seconds == 0 {
        settings.stop_timeout_seconds = DEFAULT_STOP_TIMEOUT_SECONDS;
        return true;
    }
    if settings.stop_timeout_seconds > MAX_STOP_TIMEOUT_SECONDS {
        settings.stop_timeout_seconds = MAX_STOP_TIMEOUT_SECONDS;
        return true;
    }
    false
}

fn sanitize_max_proxy_body_bytes(settings: &mut BridgeSettings) -> bool {
    let clamped = settings
        .max_proxy_body_bytes
        .clamp(MIN_MAX_PROXY_BODY_BYTES, MAX_MAX_PROXY_BODY_BYTES);
    if clamped != settings.max_proxy_body_bytes {
        settings.max_proxy_body_bytes = clamped;
        return true;
    }
    false
}

fn sanitize_dev_server_url(settings: &mut BridgeSettings) -> bool {
    let Some(url) = settings.dev_server_url.as_deref() else {
        return false;
    };
    let trimmed = url.trim();
    if trimmed.is_empty() {
        settings.dev_server_url = None;
        return true;
    }
    if trimmed.len() != url.len() {
        settings.dev_server_url = Some(trimmed.to_string());
        return true;
    }
    false
}

/// Clamps out-of-range values in place. Returns whether anything changed.
pub fn sanitize(settings: &mut BridgeSettings) -> bool {
    let mut changed = false;
    changed |= sanitize_stop_timeout(settings);
    changed |= sanitize_max_proxy_body_bytes(settings);
    changed |= sanitize_dev_server_url(settings);
    if settings.schema_version != SCHEMA_VERSION {
        settings.schema_version = SCHEMA_VERSION;
        changed = true;
    }
    changed
}

pub fn parse(content: &str) -> Result<BridgeSettings, String> {
    let mut settings: BridgeSettings =
        serde_json::from_str(content).map_err(|e| format!("invalid settings json: {e}"))?;
    if sanitize(&mut settings) {
        tracing::debug!("bridge settings sanitized");
    }
    Ok(settings)
}

/// A missing file yields defaults; a malformed one is an error.
pub fn read(path: &Path) -> Result<BridgeSettings, String> {
    match read_optional_text(path)? {
        Some(content) => {
            parse(&content).map_err(|e| format!("failed to load {}: {e}", path.display()))
        }
        None => Ok(BridgeSettings::default()),
    }
}

/// `<exe dir>/../renderer/<name>`, the layout produced by the desktop packaging step.
pub fn default_renderer_dir() -> Result<PathBuf, String> {
    let exe = std::env::current_exe().map_err(|e| format!("failed to resolve exe path: {e}"))?;
    let exe_dir = exe
        .parent()
        .ok_or_else(|| format!("exe path has no parent: {}", exe.display()))?;
    Ok(exe_dir
        .join("..")
        .join("renderer")
        .join(DEFAULT_RENDERER_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fs::unique_tmp_dir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = unique_tmp_dir("settings");
        let settings = read(&dir.join("bridge.json")).expect("read");
        assert_eq!(settings, BridgeSettings::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let settings = parse(r#"{"dev_server_url":"http://localhost:5173"}"#).expect("parse");
        assert_eq!(
            settings.dev_server_url.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(settings.stop_timeout_seconds, DEFAULT_STOP_TIMEOUT_SECONDS);
        assert_eq!(settings.max_proxy_body_bytes, DEFAULT_MAX_PROXY_BODY_BYTES);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let settings = parse(
            r#"{"schema_version":0,"stop_timeout_seconds":9999,"max_proxy_body_bytes":1}"#,
        )
        .expect("parse");
        assert_eq!(settings.schema_version, SCHEMA_VERSION);
        assert_eq!(settings.stop_timeout_seconds, MAX_STOP_TIMEOUT_SECONDS);
        assert_eq!(settings.max_proxy_body_bytes, MIN_MAX_PROXY_BODY_BYTES);

        let settings = parse(r#"{"stop_timeout_seconds":0}"#).expect("parse");
        assert_eq!(settings.stop_timeout_seconds, DEFAULT_STOP_TIMEOUT_SECONDS);
    }

    #[test]
    fn blank_dev_server_url_means_static_mode() {
        let settings = parse(r#"{"dev_server_url":"   "}"#).expect("parse");
        assert_eq!(settings.dev_server_url, None);

        let settings = parse(r#"{"dev_server_url":" http://localhost:5173 "}"#).expect("parse");
        assert_eq!(
            settings.dev_server_url.as_deref(),
            Some("http://localhost:5173")
        );
    }

    #[test]
    fn malformed_file_is_an_error_naming_the_path() {
        let dir = unique_tmp_dir("settings");
        let path = dir.join("bridge.json");
        std::fs::write(&path, "{not json").expect("write");
        let err = read(&path).unwrap_err();
        assert!(err.contains("bridge.json"), "{err}");
        assert!(err.contains("invalid settings json"), "{err}");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
