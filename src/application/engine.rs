//! Engine wiring: one explicitly constructed instance per process

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::info;

use crate::domain::config::AppConfig;
use crate::domain::entry::{ClipboardEntry, EntryId};

use super::dispatcher::{DispatchError, DispatcherConfig, PasteDispatcher, PasteStatus, WrittenFormat};
use super::events::{EngineEvent, EventBus};
use super::history_store::HistoryStore;
use super::ports::{HistoryRepository, InjectionPermission, Keystroke, SystemClipboard};
use super::self_write::SelfWriteGuard;
use super::watcher::{ClipboardWatcher, WatcherConfig};

/// Errors from engine commands
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("No entry matches '{0}'")]
    EntryNotFound(String),

    #[error("History is empty")]
    EmptyHistory,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Engine settings derived from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub capacity: usize,
    pub persist_debounce: Duration,
    pub suppression_window: Duration,
    pub watcher: WatcherConfig,
    pub dispatcher: DispatcherConfig,
}

impl EngineConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            capacity: config.capacity_or_default(),
            persist_debounce: Duration::from_millis(config.persist_debounce_ms_or_default()),
            suppression_window: Duration::from_millis(config.suppression_window_ms_or_default()),
            watcher: WatcherConfig {
                poll_interval: Duration::from_millis(config.poll_interval_ms_or_default()),
                preview_length: config.preview_length_or_default(),
            },
            dispatcher: DispatcherConfig {
                paste_delay: Duration::from_millis(config.paste_delay_ms_or_default()),
                replay_keystroke: config.paste_or_default(),
            },
        }
    }
}

impl EngineConfig {
    /// Self-write window actually used: never shorter than two poll
    /// intervals, so the watcher's next tick after a write still sees it
    pub fn effective_suppression_window(&self) -> Duration {
        self.suppression_window.max(self.watcher.poll_interval * 2)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::defaults())
    }
}

/// OS-facing collaborators handed to the engine
pub struct EnginePorts {
    pub clipboard: Arc<dyn SystemClipboard>,
    pub keystroke: Box<dyn Keystroke>,
    pub permission: Box<dyn InjectionPermission>,
    /// `None` keeps history in memory only
    pub repository: Option<Arc<dyn HistoryRepository>>,
}

type Dispatcher = PasteDispatcher<Box<dyn Keystroke>, Box<dyn InjectionPermission>>;

/// Watcher, store and dispatcher sharing one event bus and one
/// self-write guard, with an explicit `start`/`stop` lifecycle.
pub struct ClipboardEngine {
    store: Arc<HistoryStore>,
    watcher: Arc<ClipboardWatcher>,
    dispatcher: Dispatcher,
    events: EventBus,
}

impl ClipboardEngine {
    /// Build the engine and load persisted history. Monitoring does not
    /// begin until [`start`](Self::start).
    pub async fn new(config: EngineConfig, ports: EnginePorts) -> Self {
        let events = EventBus::new();

        let store = Arc::new(match ports.repository {
            Some(repository) => {
                HistoryStore::open(
                    repository,
                    config.capacity,
                    config.persist_debounce,
                    events.clone(),
                )
                .await
            }
            None => HistoryStore::in_memory(config.capacity, events.clone()),
        });

        let guard = Arc::new(SelfWriteGuard::new(config.effective_suppression_window()));

        let watcher = Arc::new(ClipboardWatcher::new(
            ports.clipboard.clone(),
            store.clone(),
            guard.clone(),
            events.clone(),
            config.watcher,
        ));

        let dispatcher = PasteDispatcher::new(
            ports.clipboard,
            ports.keystroke,
            ports.permission,
            guard,
            events.clone(),
            config.dispatcher,
        );

        Self {
            store,
            watcher,
            dispatcher,
            events,
        }
    }

    /// Begin clipboard monitoring
    pub async fn start(&self) {
        self.watcher.start().await;
    }

    /// Stop monitoring and flush pending history writes
    pub async fn stop(&self) {
        self.watcher.stop().await;
        self.store.shutdown().await;
        info!("engine stopped");
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn watcher(&self) -> &ClipboardWatcher {
        &self.watcher
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    /// Look up an entry by full id or unique prefix
    pub async fn find(&self, id_or_prefix: &str) -> Result<ClipboardEntry, EngineError> {
        let not_found = || EngineError::EntryNotFound(id_or_prefix.to_string());
        let id: EntryId = self
            .store
            .resolve(id_or_prefix)
            .await
            .ok_or_else(not_found)?;
        self.store.get(id).await.ok_or_else(not_found)
    }

    /// Write an entry to the clipboard
    pub async fn copy_to_clipboard(
        &self,
        entry: &ClipboardEntry,
        as_rich_text: bool,
    ) -> Result<WrittenFormat, EngineError> {
        Ok(self.dispatcher.copy_to_clipboard(entry, as_rich_text).await?)
    }

    /// Write an entry to the clipboard and replay the paste chord
    pub async fn paste_entry(
        &self,
        entry: &ClipboardEntry,
        as_rich_text: bool,
    ) -> Result<PasteStatus, EngineError> {
        Ok(self.dispatcher.paste_entry(entry, as_rich_text).await?)
    }

    pub(crate) async fn paste_latest(&self, as_rich_text: bool) -> Result<PasteStatus, EngineError> {
        let entry = self.store.latest().await.ok_or(EngineError::EmptyHistory)?;
        self.paste_entry(&entry, as_rich_text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::watcher::PollOutcome;
    use crate::application::test_support::{FixedPermission, MockClipboard, MockKeystroke, MockRepository};

    async fn engine(
        clipboard: Arc<MockClipboard>,
        repository: Option<Arc<MockRepository>>,
    ) -> ClipboardEngine {
        let ports = EnginePorts {
            clipboard,
            keystroke: Box::new(MockKeystroke::default()),
            permission: Box::new(FixedPermission(false)),
            repository: repository.map(|r| r as Arc<dyn HistoryRepository>),
        };
        ClipboardEngine::new(EngineConfig::default(), ports).await
    }

    #[test]
    fn config_follows_app_config() {
        let mut app = AppConfig::empty();
        app.capacity = Some(3);
        app.paste_delay_ms = Some(20);
        app.paste = Some(false);

        let config = EngineConfig::from_app_config(&app);

        assert_eq!(config.capacity, 3);
        assert_eq!(config.dispatcher.paste_delay, Duration::from_millis(20));
        assert!(!config.dispatcher.replay_keystroke);
        assert_eq!(config.watcher.poll_interval, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn pasting_an_entry_is_not_recorded_again() {
        let clipboard = Arc::new(MockClipboard::default());
        let engine = engine(clipboard.clone(), None).await;

        clipboard.copy_external("first");
        engine.watcher().poll().await;
        clipboard.copy_external("second");
        engine.watcher().poll().await;

        let first = engine.store().search("first").await.remove(0);
        engine.copy_to_clipboard(&first, false).await.unwrap();
        engine.watcher().poll().await;

        assert_eq!(engine.store().len().await, 2);
        assert_eq!(engine.store().latest().await.unwrap().raw_text(), "second");
    }

    #[test]
    fn suppression_window_covers_the_next_poll() {
        let mut config = EngineConfig::default();
        config.suppression_window = Duration::from_millis(1500);
        config.watcher.poll_interval = Duration::from_millis(2000);
        assert_eq!(config.effective_suppression_window(), Duration::from_millis(4000));

        config.watcher.poll_interval = Duration::from_millis(100);
        assert_eq!(config.effective_suppression_window(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_polling_still_suppresses_pasted_entry() {
        let clipboard = Arc::new(MockClipboard::default());
        let mut config = EngineConfig::default();
        config.suppression_window = Duration::from_millis(1500);
        config.watcher.poll_interval = Duration::from_millis(2000);
        let ports = EnginePorts {
            clipboard: clipboard.clone(),
            keystroke: Box::new(MockKeystroke::default()),
            permission: Box::new(FixedPermission(false)),
            repository: None,
        };
        let engine = ClipboardEngine::new(config, ports).await;

        clipboard.copy_external("first");
        engine.watcher().poll().await;
        clipboard.copy_external("second");
        engine.watcher().poll().await;

        let first = engine.store().search("first").await.remove(0);
        engine.copy_to_clipboard(&first, false).await.unwrap();
        tokio::time::advance(Duration::from_millis(2000)).await;

        assert_eq!(engine.watcher().poll().await, PollOutcome::SelfWrite);
        let texts: Vec<String> = engine
            .store()
            .listing()
            .await
            .iter()
            .map(|e| e.raw_text().to_string())
            .collect();
        assert_eq!(texts, ["second", "first"]);
    }

    #[tokio::test]
    async fn find_accepts_unique_prefix() {
        let clipboard = Arc::new(MockClipboard::default());
        let engine = engine(clipboard.clone(), None).await;
        clipboard.copy_external("hello");
        engine.watcher().poll().await;
        let id = engine.store().latest().await.unwrap().id();

        let found = engine.find(&id.short()).await.unwrap();

        assert_eq!(found.id(), id);
        assert!(matches!(
            engine.find("zzzz").await,
            Err(EngineError::EntryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn paste_latest_on_empty_history_fails() {
        let engine = engine(Arc::new(MockClipboard::default()), None).await;
        assert!(matches!(
            engine.paste_latest(true).await,
            Err(EngineError::EmptyHistory)
        ));
    }

    #[tokio::test]
    async fn stop_flushes_history() {
        let clipboard = Arc::new(MockClipboard::default());
        let repository = Arc::new(MockRepository::default());
        let engine = engine(clipboard.clone(), Some(repository.clone())).await;

        engine.start().await;
        clipboard.copy_external("keep me");
        engine.watcher().poll().await;
        engine.stop().await;

        let saved = repository.last_saved().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].raw_text(), "keep me");
        assert!(!engine.watcher().is_running().await);
    }
}
