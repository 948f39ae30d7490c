//! Clipboard watcher: polls the system clipboard and records new content

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::domain::classifier::{classify, Classification};
use crate::domain::entry::{ClipboardEntry, ContentHash, DEFAULT_PREVIEW_LENGTH};
use crate::domain::history::AddOutcome;

use super::events::{EngineEvent, EventBus};
use super::history_store::HistoryStore;
use super::ports::{ClipboardError, SystemClipboard};
use super::self_write::SelfWriteGuard;

/// Payloads from this size on are classified on the blocking pool
const BLOCKING_CLASSIFY_BYTES: usize = 16 * 1024;

/// Watcher settings
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub preview_length: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(crate::domain::config::DEFAULT_POLL_INTERVAL_MS),
            preview_length: DEFAULT_PREVIEW_LENGTH,
        }
    }
}

/// Result of a single poll cycle
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Change counter did not move
    Unchanged,
    /// Watcher is paused, nothing was read
    Paused,
    /// Clipboard could not be accessed; retried next tick
    Unavailable,
    /// New payload carried no recordable text
    Empty,
    /// Payload was our own recent write
    SelfWrite,
    Recorded(AddOutcome),
}

struct PollTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Detects clipboard changes without double-counting.
///
/// The change counter is compared against the last observed value; only
/// when it moved is the text read, classified and handed to the store.
pub struct ClipboardWatcher {
    clipboard: Arc<dyn SystemClipboard>,
    store: Arc<HistoryStore>,
    guard: Arc<SelfWriteGuard>,
    events: EventBus,
    config: WatcherConfig,
    // held for the whole poll so cycles never interleave
    last_change: Mutex<Option<u64>>,
    paused: AtomicBool,
    unavailable: AtomicBool,
    task: Mutex<Option<PollTask>>,
}

impl ClipboardWatcher {
    pub fn new(
        clipboard: Arc<dyn SystemClipboard>,
        store: Arc<HistoryStore>,
        guard: Arc<SelfWriteGuard>,
        events: EventBus,
        config: WatcherConfig,
    ) -> Self {
        Self {
            clipboard,
            store,
            guard,
            events,
            config,
            last_change: Mutex::new(None),
            paused: AtomicBool::new(false),
            unavailable: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Run one detection cycle
    pub async fn poll(&self) -> PollOutcome {
        if self.is_paused() {
            return PollOutcome::Paused;
        }

        let mut last_change = self.last_change.lock().await;

        let count = match self.clipboard.change_count().await {
            Ok(count) => count,
            Err(e) => {
                self.report_unavailable(&e);
                return PollOutcome::Unavailable;
            }
        };
        if *last_change == Some(count) {
            self.report_available();
            return PollOutcome::Unchanged;
        }

        let text = match self.clipboard.read_text().await {
            Ok(text) => text,
            Err(e) => {
                self.report_unavailable(&e);
                return PollOutcome::Unavailable;
            }
        };
        self.report_available();
        *last_change = Some(count);
        trace!(count, "clipboard changed");

        let Some(text) = text else {
            return PollOutcome::Empty;
        };

        if self.guard.is_suppressed(&ContentHash::of(&text)) {
            debug!("ignoring clipboard change made by paste dispatcher");
            return PollOutcome::SelfWrite;
        }

        let Some((text, classification)) = classify_payload(text).await else {
            return PollOutcome::Empty;
        };
        if !classification.is_recordable() {
            return PollOutcome::Empty;
        }

        let entry = ClipboardEntry::captured_at(
            text,
            classification.rich,
            Utc::now(),
            self.config.preview_length,
        );
        PollOutcome::Recorded(self.store.add(entry).await)
    }

    /// Record the current change counter without ingesting its content
    pub async fn prime(&self) {
        let mut last_change = self.last_change.lock().await;
        match self.clipboard.change_count().await {
            Ok(count) => *last_change = Some(count),
            Err(e) => debug!(error = %e, "could not read baseline change count"),
        }
    }

    /// Start the polling task; no-op if already running
    pub async fn start(self: &Arc<Self>) {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return;
        }

        self.prime().await;

        let watcher = Arc::clone(self);
        let (stop, mut stopped) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(watcher.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // first tick completes immediately; the baseline was just taken
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        watcher.poll().await;
                    }
                }
            }
        });

        *task = Some(PollTask { stop, handle });
        info!(
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "clipboard monitoring started"
        );
        self.events.publish(EngineEvent::MonitoringStarted);
    }

    /// Stop the polling task and wait for an in-flight cycle to finish
    pub async fn stop(&self) {
        let Some(task) = self.task.lock().await.take() else {
            return;
        };
        let _ = task.stop.send(());
        if let Err(e) = task.handle.await {
            warn!(error = %e, "polling task ended abnormally");
        }
        info!("clipboard monitoring stopped");
        self.events.publish(EngineEvent::MonitoringStopped);
    }

    pub async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }

    /// Suspend or resume ingestion; paused ticks are skipped
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
        debug!(paused, "watcher pause state changed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn report_unavailable(&self, error: &ClipboardError) {
        // log and publish once per outage, not every tick
        if !self.unavailable.swap(true, Ordering::SeqCst) {
            warn!(error = %error, "clipboard unavailable, skipping polls until it recovers");
            self.events.publish(EngineEvent::ClipboardUnavailable {
                message: error.to_string(),
            });
        }
    }

    fn report_available(&self) {
        if self.unavailable.swap(false, Ordering::SeqCst) {
            info!("clipboard access recovered");
        }
    }
}

/// Classify `text`, moving large payloads off the async workers
async fn classify_payload(text: String) -> Option<(String, Classification)> {
    if text.len() < BLOCKING_CLASSIFY_BYTES {
        let classification = classify(&text);
        return Some((text, classification));
    }

    let bytes = text.len();
    match tokio::task::spawn_blocking(move || {
        let classification = classify(&text);
        (text, classification)
    })
    .await
    {
        Ok(classified) => Some(classified),
        Err(e) => {
            warn!(error = %e, bytes, "classification task failed; payload dropped");
            None
        }
    }
}
