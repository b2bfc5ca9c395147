//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers graceful shutdown. There is no reload signal:
//! rules and content are fixed for the life of the process.

use crate::lifecycle::Shutdown;

/// Trigger `shutdown` when Ctrl-C is received.
pub fn spawn_ctrl_c_handler(shutdown: Shutdown) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, shutting down");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl-C handler"),
        }
    });
}
