//! Paste dispatcher: writes entries back to the clipboard and replays paste

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::config::DEFAULT_PASTE_DELAY_MS;
use crate::domain::entry::ClipboardEntry;

use super::events::{EngineEvent, EventBus};
use super::ports::{ClipboardError, InjectionPermission, Keystroke, SystemClipboard};
use super::self_write::SelfWriteGuard;

/// Errors from writing an entry to the clipboard
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Representation that ended up on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrittenFormat {
    PlainText,
    /// Rich flavour with the raw text as plain alternative
    RichText,
}

/// Result of a paste request. The clipboard write has succeeded in every
/// case; only keystroke replay can be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteStatus {
    Pasted(WrittenFormat),
    /// Input injection not permitted; content is on the clipboard for a
    /// manual paste
    PermissionMissing(WrittenFormat),
    /// Keystroke replay disabled by configuration
    KeystrokeDisabled(WrittenFormat),
    InjectionFailed {
        format: WrittenFormat,
        message: String,
    },
}

impl PasteStatus {
    pub fn format(&self) -> WrittenFormat {
        match self {
            Self::Pasted(format)
            | Self::PermissionMissing(format)
            | Self::KeystrokeDisabled(format)
            | Self::InjectionFailed { format, .. } => *format,
        }
    }

    pub fn keystroke_sent(&self) -> bool {
        matches!(self, Self::Pasted(_))
    }
}

/// Configuration for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Wait between clipboard write and paste keystroke
    pub paste_delay: Duration,
    /// Whether `paste_entry` replays the paste chord at all
    pub replay_keystroke: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            paste_delay: Duration::from_millis(DEFAULT_PASTE_DELAY_MS),
            replay_keystroke: true,
        }
    }
}

/// Pushes entries back to the system clipboard and optionally pastes them
pub struct PasteDispatcher<K, P>
where
    K: Keystroke,
    P: InjectionPermission,
{
    clipboard: Arc<dyn SystemClipboard>,
    keystroke: K,
    permission: P,
    guard: Arc<SelfWriteGuard>,
    events: EventBus,
    config: DispatcherConfig,
}

impl<K, P> PasteDispatcher<K, P>
where
    K: Keystroke,
    P: InjectionPermission,
{
    pub fn new(
        clipboard: Arc<dyn SystemClipboard>,
        keystroke: K,
        permission: P,
        guard: Arc<SelfWriteGuard>,
        events: EventBus,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            clipboard,
            keystroke,
            permission,
            guard,
            events,
            config,
        }
    }

    /// Write an entry to the clipboard.
    ///
    /// With `as_rich_text` and a rich representation present, the rich
    /// flavour is written together with the raw text; otherwise only the
    /// raw text. The self-write guard is armed before the write so the
    /// watcher cannot observe the change first.
    pub async fn copy_to_clipboard(
        &self,
        entry: &ClipboardEntry,
        as_rich_text: bool,
    ) -> Result<WrittenFormat, DispatchError> {
        self.guard.arm(entry.content_hash().clone());

        let result = match entry.rich().filter(|_| as_rich_text) {
            Some(document) => self
                .clipboard
                .write_rich_text(document, entry.raw_text())
                .await
                .map(|()| WrittenFormat::RichText),
            None => self
                .clipboard
                .write_text(entry.raw_text())
                .await
                .map(|()| WrittenFormat::PlainText),
        };

        match result {
            Ok(format) => {
                debug!(id = %entry.id().short(), ?format, "entry written to clipboard");
                Ok(format)
            }
            Err(e) => {
                self.guard.disarm();
                warn!(error = %e, "clipboard write failed");
                Err(e.into())
            }
        }
    }

    /// Write an entry to the clipboard, then replay the paste chord.
    ///
    /// The permission is checked before anything is injected; when it is
    /// missing the content stays on the clipboard and the status says so.
    pub async fn paste_entry(
        &self,
        entry: &ClipboardEntry,
        as_rich_text: bool,
    ) -> Result<PasteStatus, DispatchError> {
        let format = self.copy_to_clipboard(entry, as_rich_text).await?;

        if !self.config.replay_keystroke {
            return Ok(PasteStatus::KeystrokeDisabled(format));
        }

        if !self.permission.has_injection_permission() {
            info!("input injection not permitted, leaving content on clipboard");
            self.events.publish(EngineEvent::PastePermissionMissing);
            return Ok(PasteStatus::PermissionMissing(format));
        }

        // let the write settle before the target reads the clipboard
        tokio::time::sleep(self.config.paste_delay).await;

        match self.keystroke.send_paste().await {
            Ok(()) => {
                debug!(id = %entry.id().short(), "paste keystroke sent");
                Ok(PasteStatus::Pasted(format))
            }
            Err(e) => {
                warn!(error = %e, "paste keystroke failed");
                Ok(PasteStatus::InjectionFailed {
                    format,
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        ClipboardWrite, FixedPermission, MockClipboard, MockKeystroke,
    };
    use crate::domain::classifier::classify;
    use crate::domain::entry::ContentHash;
    use std::sync::atomic::Ordering;

    struct Fixture {
        clipboard: Arc<MockClipboard>,
        keystroke: Arc<MockKeystroke>,
        guard: Arc<SelfWriteGuard>,
        events: EventBus,
        dispatcher: PasteDispatcher<Arc<MockKeystroke>, FixedPermission>,
    }

    fn fixture(permitted: bool, replay: bool) -> Fixture {
        let clipboard = Arc::new(MockClipboard::default());
        let keystroke = Arc::new(MockKeystroke::default());
        let guard = Arc::new(SelfWriteGuard::new(Duration::from_millis(1500)));
        let events = EventBus::new();
        let dispatcher = PasteDispatcher::new(
            clipboard.clone(),
            keystroke.clone(),
            FixedPermission(permitted),
            guard.clone(),
            events.clone(),
            DispatcherConfig {
                paste_delay: Duration::from_millis(150),
                replay_keystroke: replay,
            },
        );
        Fixture {
            clipboard,
            keystroke,
            guard,
            events,
            dispatcher,
        }
    }

    fn markdown_entry(text: &str) -> ClipboardEntry {
        ClipboardEntry::new(text, classify(text).rich)
    }

    #[tokio::test]
    async fn rich_copy_writes_both_representations() {
        let f = fixture(true, true);
        let entry = markdown_entry("**bold**");

        let format = f.dispatcher.copy_to_clipboard(&entry, true).await.unwrap();

        assert_eq!(format, WrittenFormat::RichText);
        assert_eq!(
            f.clipboard.writes(),
            vec![ClipboardWrite::Rich {
                html: "<strong>bold</strong>".to_string(),
                plain: "**bold**".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn plain_copy_writes_raw_text() {
        let f = fixture(true, true);
        let entry = markdown_entry("**bold**");

        let format = f.dispatcher.copy_to_clipboard(&entry, false).await.unwrap();

        assert_eq!(format, WrittenFormat::PlainText);
        assert_eq!(
            f.clipboard.writes(),
            vec![ClipboardWrite::Plain("**bold**".to_string())]
        );
    }

    #[tokio::test]
    async fn rich_request_without_rich_falls_back_to_plain() {
        let f = fixture(true, true);
        let entry = markdown_entry("nothing special");

        let format = f.dispatcher.copy_to_clipboard(&entry, true).await.unwrap();

        assert_eq!(format, WrittenFormat::PlainText);
    }

    #[tokio::test]
    async fn copy_arms_self_write_guard() {
        let f = fixture(true, true);
        let entry = markdown_entry("hello");

        f.dispatcher.copy_to_clipboard(&entry, false).await.unwrap();

        assert!(f.guard.is_suppressed(&ContentHash::of("hello")));
    }

    #[tokio::test]
    async fn failed_copy_disarms_guard() {
        let f = fixture(true, true);
        f.clipboard.fail_writes.store(true, Ordering::SeqCst);
        let entry = markdown_entry("hello");

        let result = f.dispatcher.copy_to_clipboard(&entry, false).await;

        assert!(matches!(
            result,
            Err(DispatchError::Clipboard(ClipboardError::WriteFailed(_)))
        ));
        assert!(!f.guard.is_suppressed(&ContentHash::of("hello")));
    }

    #[tokio::test(start_paused = true)]
    async fn paste_writes_then_sends_keystroke_after_delay() {
        let f = fixture(true, true);
        let entry = markdown_entry("hello");
        let started = tokio::time::Instant::now();

        let status = f.dispatcher.paste_entry(&entry, false).await.unwrap();

        assert_eq!(status, PasteStatus::Pasted(WrittenFormat::PlainText));
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert_eq!(f.keystroke.paste_count(), 1);
        assert_eq!(f.clipboard.current_text().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn missing_permission_still_updates_clipboard() {
        let f = fixture(false, true);
        let mut rx = f.events.subscribe();
        let entry = markdown_entry("hello");

        let status = f.dispatcher.paste_entry(&entry, false).await.unwrap();

        assert_eq!(status, PasteStatus::PermissionMissing(WrittenFormat::PlainText));
        assert!(!status.keystroke_sent());
        assert_eq!(f.clipboard.current_text().as_deref(), Some("hello"));
        assert_eq!(f.keystroke.paste_count(), 0);
        assert_eq!(rx.recv().await.unwrap(), EngineEvent::PastePermissionMissing);
    }

    #[tokio::test]
    async fn disabled_replay_only_copies() {
        let f = fixture(true, false);
        let entry = markdown_entry("hello");

        let status = f.dispatcher.paste_entry(&entry, true).await.unwrap();

        assert_eq!(status, PasteStatus::KeystrokeDisabled(WrittenFormat::PlainText));
        assert_eq!(f.keystroke.paste_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_failure_is_reported_not_raised() {
        let f = fixture(true, true);
        f.keystroke.fail.store(true, Ordering::SeqCst);
        let entry = markdown_entry("hello");

        let status = f.dispatcher.paste_entry(&entry, false).await.unwrap();

        assert!(matches!(status, PasteStatus::InjectionFailed { .. }));
        assert_eq!(status.format(), WrittenFormat::PlainText);
    }

    #[tokio::test]
    async fn clipboard_failure_skips_keystroke() {
        let f = fixture(true, true);
        f.clipboard.fail_writes.store(true, Ordering::SeqCst);
        let entry = markdown_entry("hello");

        assert!(f.dispatcher.paste_entry(&entry, false).await.is_err());
        assert_eq!(f.keystroke.paste_count(), 0);
    }
}
