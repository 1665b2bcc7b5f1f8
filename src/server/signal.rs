// Signal handling module
//
// Supported signals:
// - SIGTERM: Stop the server
// - SIGINT:  Stop the server (Ctrl+C)

/// Wait for a shutdown signal, returning its name.
///
/// | Signal  | Action           |
/// |---------|------------------|
/// | SIGTERM | Stop (`kill <pid>`) |
/// | SIGINT  | Stop (Ctrl+C)    |
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => Ok("SIGTERM"),
        _ = sigint.recv() => Ok("SIGINT"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
