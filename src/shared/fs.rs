//! Usage: Small filesystem helpers shared across modules (optional reads, test scratch dirs).

use std::path::Path;

pub(crate) fn read_optional_text(path: &Path) -> Result<Option<String>, String> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))
}

#[cfg(test)]
pub(crate) fn unique_tmp_dir(label: &str) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TMP_DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    let seq = TMP_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "desktop_web_bridge_{label}_{nanos}_{}_{}",
        std::process::id(),
        seq
    ));
    std::fs::create_dir_all(&dir).expect("create tmp dir");
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_tmp_dir_is_unique_across_calls() {
        let a = unique_tmp_dir("fs");
        let b = unique_tmp_dir("fs");
        assert_ne!(a, b);
        let _ = std::fs::remove_dir_all(&a);
        let _ = std::fs::remove_dir_all(&b);
    }

    #[test]
    fn read_optional_text_missing_is_none() {
        let dir = unique_tmp_dir("fs");
        let out = read_optional_text(&dir.join("missing.json")).expect("read_optional_text");
        assert!(out.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_optional_text_returns_contents() {
        let dir = unique_tmp_dir("fs");
        let path = dir.join("settings.json");
        std::fs::write(&path, "{\"a\":1}").expect("write");
        let out = read_optional_text(&path)
            .expect("read_optional_text")
            .expect("file exists");
        assert_eq!(out, "{\"a\":1}");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
