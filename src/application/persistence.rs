//! Debounced background writer for the history file

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::domain::history::History;

use super::events::{EngineEvent, EventBus};
use super::ports::HistoryRepository;

enum PersistRequest {
    Dirty,
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to the writer task.
///
/// Mutations call [`mark_dirty`](Self::mark_dirty); all marks within one
/// debounce window are coalesced into a single snapshot write.
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<PersistRequest>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PersistenceHandle {
    pub fn spawn(
        repository: Arc<dyn HistoryRepository>,
        history: Arc<RwLock<History>>,
        debounce: Duration,
        events: EventBus,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = Writer {
            repository,
            history,
            events,
            debounce,
        };
        let task = tokio::spawn(writer.run(rx));
        Self {
            tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Schedule a write; never blocks
    pub fn mark_dirty(&self) {
        let _ = self.tx.send(PersistRequest::Dirty);
    }

    /// Write pending changes now and wait for completion
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(PersistRequest::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Flush pending changes and stop the writer task
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(PersistRequest::Shutdown(ack)).is_ok() {
            let _ = done.await;
        }
        if let Some(task) = self.task.lock().await.take() {
            let _ = task.await;
        }
    }
}

struct Writer {
    repository: Arc<dyn HistoryRepository>,
    history: Arc<RwLock<History>>,
    events: EventBus,
    debounce: Duration,
}

impl Writer {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<PersistRequest>) {
        // `dirty` survives failed writes so a later flush retries them
        let mut dirty = false;
        let mut deadline: Option<Instant> = None;

        loop {
            let request = match deadline {
                Some(at) => tokio::select! {
                    _ = sleep_until(at) => {
                        deadline = None;
                        dirty = !self.write().await;
                        continue;
                    }
                    request = rx.recv() => request,
                },
                None => rx.recv().await,
            };

            match request {
                Some(PersistRequest::Dirty) => {
                    dirty = true;
                    deadline.get_or_insert_with(|| Instant::now() + self.debounce);
                }
                Some(PersistRequest::Flush(ack)) => {
                    if dirty {
                        deadline = None;
                        dirty = !self.write().await;
                    }
                    let _ = ack.send(());
                }
                Some(PersistRequest::Shutdown(ack)) => {
                    if dirty {
                        self.write().await;
                    }
                    let _ = ack.send(());
                    return;
                }
                None => {
                    if dirty {
                        self.write().await;
                    }
                    return;
                }
            }
        }
    }

    /// Save a snapshot; returns whether it succeeded
    async fn write(&self) -> bool {
        let snapshot = self.history.read().await.entries().to_vec();
        match self.repository.save(&snapshot).await {
            Ok(()) => {
                debug!(
                    entries = snapshot.len(),
                    location = %self.repository.location(),
                    "history saved"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "history not saved, keeping in-memory state");
                self.events.publish(EngineEvent::PersistenceFailed {
                    message: e.to_string(),
                });
                false
            }
        }
    }
}
