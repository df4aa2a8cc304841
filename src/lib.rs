pub mod app;
pub mod infra;
mod shared;
pub mod web;

pub use web::{
    find_available_port, is_web_server_running, start_web_server, stop_web_server, web_server_status, UiSource,
    WebServerOptions, WebServerStatus,
};
