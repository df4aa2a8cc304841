//! Usage: Process-wide state holding the single web bridge manager.

use crate::web::WebServerManager;
use std::sync::Mutex;

#[derive(Default)]
pub struct WebServerState(pub Mutex<WebServerManager>);
