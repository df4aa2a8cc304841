//! Usage: Best-effort web bridge shutdown (graceful signal, bounded wait, then abort).

use super::app_state::WebServerState;
use crate::shared::mutex_ext::MutexExt;
use std::time::Duration;

const ABORT_GRACE: Duration = Duration::from_secs(1);

pub async fn stop_web_server_best_effort(state: &WebServerState) {
    // The lock is released before awaiting the server task.
    let running = {
        let mut manager = state.0.lock_or_recover();
        manager.take_running()
    };

    let Some(running) = running else {
        return;
    };

    let port = running.port;
    let stop_timeout = running.stop_timeout;
    let mut task = running.task;
    let _ = running.shutdown.send(());

    if tokio::time::timeout(stop_timeout, &mut task).await.is_err() {
        tracing::warn!(
            port,
            timeout_ms = stop_timeout.as_millis() as u64,
            "web server stop timed out, aborting server task"
        );
        task.abort();
        let _ = tokio::time::timeout(ABORT_GRACE, &mut task).await;
    }

    tracing::info!(port, "web server stopped");
}
