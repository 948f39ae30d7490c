//! History store service: the shared, persisted entry collection

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::entry::{ClipboardEntry, EntryId};
use crate::domain::history::{AddOutcome, History};

use super::events::{EngineEvent, EventBus};
use super::persistence::PersistenceHandle;
use super::ports::HistoryRepository;

/// Authoritative, capacity-bounded collection of clipboard entries.
///
/// Every mutation takes the write lock, so eviction and dedup bookkeeping
/// never race; queries share the read lock and return owned snapshots.
/// Mutations publish an [`EngineEvent`] and schedule a debounced save.
pub struct HistoryStore {
    history: Arc<RwLock<History>>,
    events: EventBus,
    persistence: Option<PersistenceHandle>,
}

impl HistoryStore {
    /// Load the persisted history and start the background writer.
    ///
    /// An unreadable or corrupt store is logged and treated as empty; the
    /// next successful save replaces it.
    pub async fn open(
        repository: Arc<dyn HistoryRepository>,
        capacity: usize,
        debounce: Duration,
        events: EventBus,
    ) -> Self {
        let entries = match repository.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    error = %e,
                    location = %repository.location(),
                    "starting with empty history"
                );
                Vec::new()
            }
        };
        let history = History::from_entries(entries, capacity);
        info!(
            entries = history.len(),
            capacity = history.capacity(),
            location = %repository.location(),
            "history loaded"
        );

        let history = Arc::new(RwLock::new(history));
        let persistence =
            PersistenceHandle::spawn(repository, history.clone(), debounce, events.clone());

        Self {
            history,
            events,
            persistence: Some(persistence),
        }
    }

    /// Non-persisted store
    pub fn in_memory(capacity: usize, events: EventBus) -> Self {
        Self {
            history: Arc::new(RwLock::new(History::new(capacity))),
            events,
            persistence: None,
        }
    }

    /// Record a captured entry. Only the watcher feeds entries in.
    pub(crate) async fn add(&self, entry: ClipboardEntry) -> AddOutcome {
        let has_rich = entry.has_rich();
        let outcome = self.history.write().await.add(entry);

        match &outcome {
            AddOutcome::Inserted { id, evicted } => {
                debug!(id = %id.short(), has_rich, "entry added");
                self.events.publish(EngineEvent::EntryAdded { id: *id, has_rich });
                if let Some(evicted) = evicted {
                    debug!(id = %evicted.id().short(), "entry evicted");
                    self.events.publish(EngineEvent::EntryEvicted { id: evicted.id() });
                }
                self.mark_dirty();
            }
            AddOutcome::Duplicate { existing } => {
                debug!(id = %existing.short(), "duplicate of latest entry skipped");
            }
            AddOutcome::Rejected => {
                warn!("history is full of favorites, capture dropped");
                self.events.publish(EngineEvent::EntryRejected);
            }
        }
        outcome
    }

    /// Flip the favorite flag; returns the new state, `None` if absent
    pub async fn toggle_favorite(&self, id: EntryId) -> Option<bool> {
        let is_favorite = self.history.write().await.toggle_favorite(id)?;
        self.events
            .publish(EngineEvent::FavoriteToggled { id, is_favorite });
        self.mark_dirty();
        Some(is_favorite)
    }

    /// Remove an entry; returns whether it existed
    pub async fn delete_entry(&self, id: EntryId) -> bool {
        let removed = self.history.write().await.delete(id).is_some();
        if removed {
            self.events.publish(EngineEvent::EntryDeleted { id });
            self.mark_dirty();
        }
        removed
    }

    /// Remove every non-favorite entry; returns how many were removed
    pub async fn clear_history(&self) -> usize {
        let removed = self.history.write().await.clear();
        self.events.publish(EngineEvent::HistoryCleared { removed });
        if removed > 0 {
            self.mark_dirty();
        }
        removed
    }

    /// Remove every entry, favorites included
    pub async fn clear_all_history(&self) -> usize {
        let removed = self.history.write().await.clear_all();
        self.events
            .publish(EngineEvent::AllHistoryCleared { removed });
        if removed > 0 {
            self.mark_dirty();
        }
        removed
    }

    /// Case-insensitive substring search in display order
    pub async fn search(&self, query: &str) -> Vec<ClipboardEntry> {
        self.history
            .read()
            .await
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All entries in display order (favorites first, then newest first)
    pub async fn listing(&self) -> Vec<ClipboardEntry> {
        self.history
            .read()
            .await
            .listing()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: EntryId) -> Option<ClipboardEntry> {
        self.history.read().await.get(id).cloned()
    }

    /// Most recently captured entry by insertion order
    pub async fn latest(&self) -> Option<ClipboardEntry> {
        self.history.read().await.latest().cloned()
    }

    /// Resolve a unique id prefix
    pub async fn resolve(&self, prefix: &str) -> Option<EntryId> {
        self.history.read().await.resolve(prefix)
    }

    pub async fn len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.read().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.history.read().await.capacity()
    }

    /// Write pending changes now
    pub async fn flush(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.flush().await;
        }
    }

    /// Flush pending changes and stop the background writer
    pub async fn shutdown(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.shutdown().await;
        }
    }

    fn mark_dirty(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.mark_dirty();
        }
    }
}
