//! Signal handling for daemon mode

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::ipc::{DaemonRequest, Reply};

/// Input to the daemon loop
#[derive(Debug)]
pub enum DaemonSignal {
    /// Client request with the channel its reply goes back on
    Request(DaemonRequest, oneshot::Sender<Reply>),
    /// Shutdown daemon (SIGINT/SIGTERM)
    Shutdown,
}

/// Inbox of the daemon loop: socket requests plus SIGINT/SIGTERM
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonSignal>,
}

impl DaemonSignalHandler {
    /// Install the signal listeners. The returned sender is for the
    /// socket server.
    pub async fn new() -> Result<(Self, mpsc::Sender<DaemonSignal>), std::io::Error> {
        let (tx, receiver) = mpsc::channel(16);

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let shutdown = tx.clone();
        tokio::spawn(async move {
            let name = tokio::select! {
                _ = interrupt.recv() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            };
            info!(signal = name, "shutdown requested");
            let _ = shutdown.send(DaemonSignal::Shutdown).await;
        });

        Ok((Self { receiver }, tx))
    }

    pub async fn recv(&mut self) -> Option<DaemonSignal> {
        self.receiver.recv().await
    }
}
