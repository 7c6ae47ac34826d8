use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Turns SIGINT and SIGTERM into cancellation of the running transfer. An
/// import stops before its next batch and keeps the rows already inserted.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    cancel_token: CancellationToken,
    interrupted: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new(cancel_token: CancellationToken) -> Self {
        Self {
            cancel_token,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawns the signal listener. Must be called inside the tokio runtime.
    pub fn register_handlers(&self) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let signal_name = tokio::select! {
                _ = interrupt() => "SIGINT",
                _ = terminate() => "SIGTERM",
                _ = coordinator.cancel_token.cancelled() => return,
            };
            info!(signal = signal_name, "Stopping after the current batch");
            coordinator.interrupted.store(true, Ordering::SeqCst);
            coordinator.cancel_token.cancel();
        });
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

async fn interrupt() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "Failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            warn!(error = %err, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    ShutdownRequested = 130, // 128 + SIGINT
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_external_cancel_is_not_a_signal() {
        let coordinator = ShutdownCoordinator::new(CancellationToken::new());
        coordinator.register_handlers();
        coordinator.cancel_token().cancel();
        tokio::task::yield_now().await;

        assert!(coordinator.cancel_token().is_cancelled());
        assert!(!coordinator.is_shutdown_requested());
    }
}
