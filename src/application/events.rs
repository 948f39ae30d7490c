//! Engine events published to subscribers (presentation layer, daemon)

use tokio::sync::broadcast;

use crate::domain::entry::EntryId;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// State changes and requests published by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    EntryAdded { id: EntryId, has_rich: bool },
    EntryEvicted { id: EntryId },
    /// A capture was dropped because every slot holds a favorite
    EntryRejected,
    FavoriteToggled { id: EntryId, is_favorite: bool },
    EntryDeleted { id: EntryId },
    HistoryCleared { removed: usize },
    AllHistoryCleared { removed: usize },
    PersistenceFailed { message: String },
    MonitoringStarted,
    MonitoringStopped,
    ClipboardUnavailable { message: String },
    ShowHistoryRequested,
    PastePermissionMissing,
}

/// Broadcast channel for [`EngineEvent`]s.
///
/// Publishing never blocks and never fails; events sent while nobody is
/// subscribed are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: EngineEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_fine() {
        EventBus::new().publish(EngineEvent::MonitoringStarted);
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(EngineEvent::MonitoringStarted);
        bus.publish(EngineEvent::ShowHistoryRequested);

        assert_eq!(rx.recv().await.unwrap(), EngineEvent::MonitoringStarted);
        assert_eq!(rx.recv().await.unwrap(), EngineEvent::ShowHistoryRequested);
    }
}
