//! Usage: Process-wide tracing setup (stdout + optional daily JSON file under `log_dir`).

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "web-bridge.log";
const DEFAULT_FILTER: &str = "desktop_web_bridge=info,tower_http=info,info";

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Keeps the file writer flushing; drop it only at process exit.
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Only the first successful call installs anything; later calls return an empty guard.
/// A failed call leaves logging uninstalled so it can be retried.
pub fn init(log_dir: Option<&Path>) -> Result<LoggingGuard, String> {
    if LOGGING_INITIALIZED.load(Ordering::SeqCst) {
        return Ok(LoggingGuard { _file: None });
    }

    let file_guard = install(log_dir)?;
    LOGGING_INITIALIZED.store(true, Ordering::SeqCst);

    if let Err(err) = tracing_log::LogTracer::init() {
        tracing::warn!("log bridge not installed: {}", err);
    }

    if let Some(dir) = log_dir {
        tracing::info!(dir = %dir.display(), "logging initialized (daily rolling {})", LOG_FILE_NAME);
    }

    Ok(LoggingGuard { _file: file_guard })
}

fn install(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, String> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("failed to create log dir {}: {e}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("failed to install tracing subscriber: {e}"))?;
    Ok(file_guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fs::unique_tmp_dir;

    #[test]
    fn failed_init_can_be_retried_and_second_success_is_a_no_op() {
        let dir = unique_tmp_dir("logging");
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, "file").expect("write blocker");

        let err = init(Some(&blocker.join("logs"))).err().expect("init fails");
        assert!(err.starts_with("failed to create log dir"), "{err}");
        assert!(!LOGGING_INITIALIZED.load(Ordering::SeqCst));

        let log_dir = dir.join("logs");
        let _guard = init(Some(&log_dir)).expect("retry installs");
        assert!(LOGGING_INITIALIZED.load(Ordering::SeqCst));
        assert!(log_dir.is_dir());

        let again = init(None).expect("second init");
        assert!(again._file.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
