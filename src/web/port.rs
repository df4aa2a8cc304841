//! Usage: Loopback port discovery + binding for the web server.

use std::net::{Ipv4Addr, SocketAddr, TcpListener};

pub(crate) const LOOPBACK_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Asks the OS for a free loopback port. The probe socket is released before returning.
pub fn find_available_port() -> Result<u16, String> {
    let probe = TcpListener::bind((LOOPBACK_HOST, 0))
        .map_err(|e| format!("failed to probe free port on {LOOPBACK_HOST}: {e}"))?;
    let port = probe
        .local_addr()
        .map_err(|e| format!("failed to read probe address: {e}"))?
        .port();
    drop(probe);

    tracing::info!(port, "found available port for web server: {}", port);
    Ok(port)
}

/// Binds `127.0.0.1:<port>`. If the port was taken since it was probed, falls back once to port 0.
pub(crate) fn bind_loopback(port: u16) -> Result<(TcpListener, u16), String> {
    let listener = match TcpListener::bind((LOOPBACK_HOST, port)) {
        Ok(listener) => listener,
        Err(err) if port != 0 => {
            tracing::warn!(port, "port {} no longer available ({}), rebinding", port, err);
            TcpListener::bind((LOOPBACK_HOST, 0))
                .map_err(|e| format!("failed to bind {LOOPBACK_HOST}:0: {e}"))?
        }
        Err(err) => return Err(format!("failed to bind {LOOPBACK_HOST}:{port}: {err}")),
    };

    let addr: SocketAddr = listener
        .local_addr()
        .map_err(|e| format!("failed to read listener address: {e}"))?;
    Ok((listener, addr.port()))
}
