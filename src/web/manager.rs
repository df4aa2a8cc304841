//! Usage: Web bridge lifecycle (bind + spawn + status); at most one server per manager.

use super::port::{bind_loopback, find_available_port, LOOPBACK_HOST};
use super::router::build_router;
use super::state::{BridgeState, UiMode, WebServerOptions};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebServerStatus {
    pub running: bool,
    pub port: Option<u16>,
    pub base_url: Option<String>,
    pub mode: Option<&'static str>,
}

impl WebServerStatus {
    fn stopped() -> Self {
        Self {
            running: false,
            port: None,
            base_url: None,
            mode: None,
        }
    }
}

pub(crate) struct RunningWebServer {
    pub(crate) port: u16,
    pub(crate) mode: &'static str,
    pub(crate) shutdown: oneshot::Sender<()>,
    pub(crate) task: JoinHandle<()>,
    pub(crate) stop_timeout: Duration,
}

#[derive(Default)]
pub struct WebServerManager {
    running: Option<RunningWebServer>,
}

impl WebServerManager {
    pub fn status(&self) -> WebServerStatus {
        match &self.running {
            Some(running) => WebServerStatus {
                running: true,
                port: Some(running.port),
                base_url: Some(format!("http://{LOOPBACK_HOST}:{}", running.port)),
                mode: Some(running.mode),
            },
            None => WebServerStatus::stopped(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Must be called from inside a Tokio runtime; the server task is spawned onto it.
    pub fn start(&mut self, options: WebServerOptions) -> Result<WebServerStatus, String> {
        if let Some(running) = &self.running {
            if !running.task.is_finished() {
                tracing::info!(port = running.port, "web server already running");
                return Ok(self.status());
            }
            tracing::warn!(port = running.port, "web server task exited, restarting");
            self.running = None;
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| format!("web server requires a tokio runtime: {e}"))?;

        let state = Arc::new(BridgeState::new(&options)?);
        match &state.ui {
            UiMode::DevServer(url) => tracing::info!(
                dev_server = %url,
                "development mode: serving with dev server at {}",
                url
            ),
            UiMode::Static(dir) => {
                tracing::info!("serving static files from: {}", dir.display())
            }
        }

        let port = find_available_port()?;
        let (std_listener, port) = bind_loopback(port)?;
        std_listener
            .set_nonblocking(true)
            .map_err(|e| format!("failed to set listener non-blocking: {e}"))?;

        let app = build_router(state);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = runtime.spawn(async move {
            let listener = match tokio::net::TcpListener::from_std(std_listener) {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("web server error: failed to register listener: {}", err);
                    return;
                }
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                tracing::error!("web server error: {}", err);
            }
        });

        tracing::info!(port, "web server started on http://{}:{}", LOOPBACK_HOST, port);

        self.running = Some(RunningWebServer {
            port,
            mode: options.ui_source.mode(),
            shutdown: shutdown_tx,
            task,
            stop_timeout: options.stop_timeout,
        });
        Ok(self.status())
    }

    pub(crate) fn take_running(&mut self) -> Option<RunningWebServer> {
        self.running.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::app_state::WebServerState;
    use crate::app::cleanup::stop_web_server_best_effort;
    use crate::shared::fs::unique_tmp_dir;
    use crate::shared::mutex_ext::MutexExt;
    use crate::web::runtime_config::ConfigEnv;
    use crate::web::state::UiSource;

    fn options(dir: &std::path::Path) -> WebServerOptions {
        let mut options = WebServerOptions::new(
            4400,
            dir.to_path_buf(),
            "manager-secret".to_string(),
            UiSource::Static(dir.to_path_buf()),
        );
        options.env = ConfigEnv::default();
        options
    }

    #[test]
    fn start_outside_runtime_is_an_error() {
        let dir = unique_tmp_dir("manager");
        let mut manager = WebServerManager::default();
        let err = manager.start(options(&dir)).unwrap_err();
        assert!(err.contains("tokio runtime"), "{err}");
        assert!(!manager.is_running());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_serves_over_loopback_and_stop_releases() {
        let dir = unique_tmp_dir("manager");
        std::fs::write(dir.join("index.html"), "<html><head></head><body>ok</body></html>")
            .expect("write index");

        let state = WebServerState::default();
        let status = state
            .0
            .lock_or_recover()
            .start(options(&dir))
            .expect("start");
        assert!(status.running);
        assert_eq!(status.mode, Some("static"));
        let port = status.port.expect("port");
        assert_eq!(
            status.base_url.as_deref(),
            Some(format!("http://127.0.0.1:{port}").as_str())
        );

        let body = reqwest::get(format!("http://127.0.0.1:{port}/"))
            .await
            .expect("request")
            .text()
            .await
            .expect("body");
        assert!(body.contains("\"secretKey\":\"manager-secret\""));

        stop_web_server_best_effort(&state).await;
        assert!(!state.0.lock_or_recover().is_running());
        assert_eq!(state.0.lock_or_recover().status(), WebServerStatus::stopped());
        assert!(reqwest::get(format!("http://127.0.0.1:{port}/")).await.is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    async fn spawn_slow_upstream() -> u16 {
        let app = axum::Router::new().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        port
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_aborts_server_stuck_on_in_flight_request() {
        let upstream_port = spawn_slow_upstream().await;
        let dir = unique_tmp_dir("manager");
        let mut options = options(&dir);
        options.ui_source = UiSource::DevServer(format!("http://127.0.0.1:{upstream_port}"));
        options.stop_timeout = Duration::from_millis(300);

        let state = WebServerState::default();
        let port = state
            .0
            .lock_or_recover()
            .start(options)
            .expect("start")
            .port
            .expect("port");

        let in_flight = tokio::spawn(reqwest::get(format!("http://127.0.0.1:{port}/slow")));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!in_flight.is_finished());

        let started = std::time::Instant::now();
        stop_web_server_best_effort(&state).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(300 + 1000 + 500), "{elapsed:?}");

        assert!(!state.0.lock_or_recover().is_running());
        assert!(std::net::TcpStream::connect(("127.0.0.1", port)).is_err());

        in_flight.abort();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn status_serializes_to_json() {
        let stopped = serde_json::to_value(WebServerStatus::stopped()).expect("json");
        assert_eq!(
            stopped,
            serde_json::json!({ "running": false, "port": null, "base_url": null, "mode": null })
        );

        let running = WebServerStatus {
            running: true,
            port: Some(4123),
            base_url: Some("http://127.0.0.1:4123".to_string()),
            mode: Some("dev_server"),
        };
        let value = serde_json::to_value(running).expect("json");
        assert_eq!(value["port"], 4123);
        assert_eq!(value["base_url"], "http://127.0.0.1:4123");
        assert_eq!(value["mode"], "dev_server");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_start_returns_the_tracked_server() {
        let dir = unique_tmp_dir("manager");
        let state = WebServerState::default();

        let first = state.0.lock_or_recover().start(options(&dir)).expect("start");
        let second = state.0.lock_or_recover().start(options(&dir)).expect("start again");
        assert_eq!(first, second);

        stop_web_server_best_effort(&state).await;
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn stop_without_server_is_a_no_op() {
        let state = WebServerState::default();
        stop_web_server_best_effort(&state).await;
        assert!(!state.0.lock_or_recover().is_running());
    }
}
