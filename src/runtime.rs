//! Runtime - shutdown handle for the server

use std::sync::Arc;
use tokio::sync::watch;

/// Shared stop flag. Any clone may trigger; every clone observes it.
#[derive(Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self { Self::new() }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender: Arc::new(sender) }
    }

    /// Idempotent: only the first call notifies waiters.
    pub fn trigger(&self) {
        self.sender.send_if_modified(|stopped| !std::mem::replace(stopped, true));
    }

    pub fn is_triggered(&self) -> bool { *self.sender.borrow() }

    /// Resolves once `trigger` has been called, immediately if it already was.
    pub async fn wait(&self) {
        let mut rx = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

/// Spawn a task that triggers the returned handle on SIGINT/SIGTERM
/// (Ctrl+C off unix).
pub fn install_signal_handlers() -> Shutdown {
    let shutdown = Shutdown::new();
    let handle = shutdown.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(mut sigterm), Ok(mut sigint)) => tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                    _ = sigint.recv() => tracing::info!("Received SIGINT"),
                },
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!(error = %e, "signal handlers unavailable");
                    return;
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Ctrl+C handler unavailable");
                return;
            }
            tracing::info!("Received Ctrl+C");
        }

        handle.trigger();
    });

    shutdown
}
