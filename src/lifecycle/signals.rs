//! OS signal handling.
//!
//! # Responsibilities
//! - Translate SIGTERM/SIGINT into graceful shutdown
//! - Translate SIGHUP into a configuration reload request
//!
//! # Design Decisions
//! - Uses Tokio's async-safe signal handling
//! - SIGHUP reloads; it never shuts the daemon down

/// Resolve when a shutdown signal (SIGINT/SIGTERM) arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}

/// Resolve each time SIGHUP arrives (Unix only; pends forever elsewhere).
pub async fn reload_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("SIGHUP received, reload requested");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler");
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    std::future::pending::<()>().await;
}
