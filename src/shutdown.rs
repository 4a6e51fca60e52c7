use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

/// Set-once shutdown flag plus a wait-group over the tasks that must finish
/// before the process exits.
#[derive(Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
    tracker: TaskTracker,
    fired: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns `true` only for the call that actually initiated shutdown.
    pub fn trigger(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn wait(&self) {
        self.token.cancelled().await;
    }

    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(task)
    }

    /// Waits for every tracked task; no new tasks are accepted afterwards.
    pub async fn drain(&self) {
        self.tracker.close();
        info!(tasks = self.tracker.len(), "Waiting for in-flight work");
        self.tracker.wait().await;
        info!("All tracked tasks finished");
    }

    pub fn on_signal(&self, signal: &str) {
        if self.trigger() {
            info!(signal, "Received signal, shutting down");
        } else {
            warn!(signal, "Received signal, shutdown already in progress");
        }
    }

    /// Turns SIGINT, SIGTERM and SIGHUP into a shutdown. Runs until the task
    /// is dropped or aborted.
    #[cfg(unix)]
    pub async fn listen_for_signals(&self) -> std::io::Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sighup = signal(SignalKind::hangup())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        info!("Graceful shutdown enabled");

        loop {
            let name = tokio::select! {
                _ = sighup.recv() => "SIGHUP",
                _ = sigint.recv() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            };
            self.on_signal(name);
        }
    }

    #[cfg(not(unix))]
    pub async fn listen_for_signals(&self) -> std::io::Result<()> {
        info!("Graceful shutdown enabled");

        loop {
            tokio::signal::ctrl_c().await?;
            self.on_signal("Ctrl-C");
        }
    }
}
