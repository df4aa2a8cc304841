//! Usage: Splice the runtime config into served HTML.

use super::runtime_config::{inline_config_block, RuntimeConfig};

pub(crate) const CONFIG_SCRIPT_PATH: &str = "/goose-config.js";

/// Dev mode: reference `/goose-config.js` right after the first `<head>`.
pub fn inject_config_script_tag(html: &str) -> String {
    html.replacen(
        "<head>",
        &format!("<head>\n    <script src=\"{CONFIG_SCRIPT_PATH}\"></script>"),
        1,
    )
}

/// Static mode: inline the config right before the first `</head>`.
pub fn inject_inline_config(html: &str, config: &RuntimeConfig) -> String {
    html.replacen(
        "</head>",
        &format!("{}</head>", inline_config_block(config)),
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::runtime_config::ConfigEnv;
    use std::path::PathBuf;

    fn config() -> RuntimeConfig {
        RuntimeConfig::new(4123, &PathBuf::from("/tmp"), "key", &ConfigEnv::default())
    }

    #[test]
    fn script_tag_follows_first_head_only() {
        let html = "<html><head><title>x</title></head><body><head></head></body></html>";
        let out = inject_config_script_tag(html);
        assert!(out.starts_with(
            "<html><head>\n    <script src=\"/goose-config.js\"></script><title>x</title>"
        ));
        assert_eq!(out.matches("goose-config.js").count(), 1);
    }

    #[test]
    fn inline_config_lands_before_closing_head() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let out = inject_inline_config(html, &config());
        let script_at = out.find("window.gooseConfig").expect("config injected");
        let head_close_at = out.find("</head>").expect("head close");
        let title_at = out.find("<title>").expect("title");
        assert!(title_at < script_at && script_at < head_close_at);
        assert!(out.contains("\"GOOSE_PORT\":4123"));
    }

    #[test]
    fn html_without_markers_is_unchanged() {
        let html = "<p>fragment</p>";
        assert_eq!(inject_config_script_tag(html), html);
        assert_eq!(inject_inline_config(html, &config()), html);
    }
}
