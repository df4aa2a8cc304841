//! Usage: Application layer (process-wide state, shutdown cleanup, logging setup).

pub mod app_state;
pub mod cleanup;
pub mod logging;
