//! Usage: `desktop-web-bridge` binary (serve the desktop UI over loopback until Ctrl-C).

use clap::Parser;
use desktop_web_bridge::app::logging;
use desktop_web_bridge::infra::settings::{self, BridgeSettings};
use desktop_web_bridge::web::{self, UiSource, WebServerOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Local HTTP bridge that lets a browser load the desktop UI.
#[derive(Parser, Debug, Clone)]
#[command(name = "desktop-web-bridge")]
#[command(about = "Serve the desktop web UI to an ordinary browser on 127.0.0.1")]
struct Args {
    /// Port of the local API server the UI talks to
    #[arg(long, env = "WEB_BRIDGE_API_PORT")]
    api_port: u16,

    /// Working directory reported to the UI (defaults to the current directory)
    #[arg(long, env = "WEB_BRIDGE_WORKING_DIR")]
    working_dir: Option<PathBuf>,

    /// Secret the UI presents to the API server
    #[arg(long, env = "WEB_BRIDGE_SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    /// Live-reloading asset server; when set the bridge proxies to it
    #[arg(long, env = "WEB_BRIDGE_DEV_SERVER_URL")]
    dev_server_url: Option<String>,

    /// Built renderer directory (defaults to `<exe dir>/../renderer/main_window`)
    #[arg(long, env = "WEB_BRIDGE_RENDERER_DIR")]
    renderer_dir: Option<PathBuf>,

    /// Optional JSON settings file
    #[arg(long, env = "WEB_BRIDGE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Directory for the daily rolling JSON log
    #[arg(long, env = "WEB_BRIDGE_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<BridgeSettings, String> {
    match args.settings.as_deref() {
        Some(path) => settings::read(path),
        None => Ok(BridgeSettings::default()),
    }
}

fn build_options(args: Args, settings: BridgeSettings) -> Result<WebServerOptions, String> {
    let working_dir = match args.working_dir {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map_err(|e| format!("failed to resolve current directory: {e}"))?,
    };
    let static_dir = match args.renderer_dir.or(settings.renderer_dir) {
        Some(dir) => dir,
        None => settings::default_renderer_dir()?,
    };
    let dev_server_url = args.dev_server_url.or(settings.dev_server_url);
    let ui_source = UiSource::resolve(dev_server_url.as_deref(), static_dir);

    let mut options = WebServerOptions::new(args.api_port, working_dir, args.secret_key, ui_source);
    options.stop_timeout = Duration::from_secs(u64::from(settings.stop_timeout_seconds));
    options.max_proxy_body_bytes = settings.max_proxy_body_bytes;
    Ok(options)
}

async fn run(args: Args, settings: BridgeSettings) -> Result<(), String> {
    let options = build_options(args, settings)?;
    let port = web::start_web_server(options)?;
    println!("web UI available at http://127.0.0.1:{port}");
    match serde_json::to_string(&web::web_server_status()) {
        Ok(status) => tracing::info!(status = %status, "web bridge ready"),
        Err(err) => tracing::warn!("failed to serialize web server status: {}", err),
    }

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", err);
    }
    tracing::info!("shutdown requested");
    web::stop_web_server().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = args.log_dir.clone().or_else(|| settings.log_dir.clone());
    let _logging = match logging::init(log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(args, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("web bridge failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
