//! Usage: Browser stand-in for the native desktop API (`window.electron`).
//!
//! The UI calls into `window.electron` for windows, files, updates and IPC. Outside the desktop
//! shell those calls resolve to logged no-ops or empty promises so the same bundle still boots.

/// Assigns `window.electron`. Expects `window.gooseConfig` to be set before it runs.
pub(crate) const DESKTOP_BRIDGE_SCRIPT: &str = include_str!("desktop_bridge.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_reports_web_platform_and_reads_injected_config() {
        assert!(DESKTOP_BRIDGE_SCRIPT.starts_with("window.electron = {"));
        assert!(DESKTOP_BRIDGE_SCRIPT.contains("platform: 'web'"));
        assert!(DESKTOP_BRIDGE_SCRIPT.contains("getConfig: () => window.gooseConfig"));
    }

    #[test]
    fn bridge_covers_ipc_shim() {
        for name in ["send:", "invoke:", "removeAllListeners:"] {
            assert!(DESKTOP_BRIDGE_SCRIPT.contains(name), "missing {name}");
        }
    }

    #[test]
    fn bridge_has_no_script_terminator() {
        assert!(!DESKTOP_BRIDGE_SCRIPT.contains("</script"));
    }
}
