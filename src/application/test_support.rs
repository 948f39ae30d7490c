//! In-memory port doubles shared by the service tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entry::ClipboardEntry;
use crate::domain::markdown::RichDocument;

use super::ports::{
    ClipboardError, HistoryRepository, InjectionPermission, Keystroke, KeystrokeError,
    PersistenceError, SystemClipboard,
};

/// What the engine last put on the clipboard
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardWrite {
    Plain(String),
    Rich { html: String, plain: String },
}

#[derive(Default)]
struct ClipboardState {
    change_count: u64,
    text: Option<String>,
    writes: Vec<ClipboardWrite>,
}

/// Clipboard double with a change counter like the real pasteboard
#[derive(Default)]
pub struct MockClipboard {
    state: Mutex<ClipboardState>,
    pub deny_access: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MockClipboard {
    /// Simulate another application copying text
    pub fn copy_external(&self, text: &str) {
        let mut state = self.state.lock().unwrap();
        state.change_count += 1;
        state.text = Some(text.to_string());
    }

    /// Simulate a non-text payload (image, files)
    pub fn copy_non_text(&self) {
        let mut state = self.state.lock().unwrap();
        state.change_count += 1;
        state.text = None;
    }

    pub fn current_text(&self) -> Option<String> {
        self.state.lock().unwrap().text.clone()
    }

    pub fn writes(&self) -> Vec<ClipboardWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    fn check_access(&self) -> Result<(), ClipboardError> {
        if self.deny_access.load(Ordering::SeqCst) {
            return Err(ClipboardError::AccessDenied("revoked".to_string()));
        }
        Ok(())
    }

    fn record(&self, text: &str, write: ClipboardWrite) -> Result<(), ClipboardError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClipboardError::WriteFailed("busy".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.change_count += 1;
        state.text = Some(text.to_string());
        state.writes.push(write);
        Ok(())
    }
}

#[async_trait]
impl SystemClipboard for MockClipboard {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        self.check_access()?;
        Ok(self.state.lock().unwrap().change_count)
    }

    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.check_access()?;
        Ok(self.state.lock().unwrap().text.clone())
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.check_access()?;
        self.record(text, ClipboardWrite::Plain(text.to_string()))
    }

    async fn write_rich_text(
        &self,
        document: &RichDocument,
        plain: &str,
    ) -> Result<(), ClipboardError> {
        self.check_access()?;
        self.record(
            plain,
            ClipboardWrite::Rich {
                html: document.to_html(),
                plain: plain.to_string(),
            },
        )
    }
}

/// Keystroke double counting paste chords
#[derive(Default)]
pub struct MockKeystroke {
    pub pastes: AtomicUsize,
    pub fail: AtomicBool,
}

impl MockKeystroke {
    pub fn paste_count(&self) -> usize {
        self.pastes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Keystroke for MockKeystroke {
    async fn send_paste(&self) -> Result<(), KeystrokeError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(KeystrokeError::InjectionFailed("no focus".to_string()));
        }
        self.pastes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FixedPermission(pub bool);

impl InjectionPermission for FixedPermission {
    fn has_injection_permission(&self) -> bool {
        self.0
    }
}

/// In-memory repository recording every save
#[derive(Default)]
pub struct MockRepository {
    pub initial: Mutex<Vec<ClipboardEntry>>,
    pub saves: Mutex<Vec<Vec<ClipboardEntry>>>,
    pub fail_load: AtomicBool,
    pub fail_save: AtomicBool,
}

impl MockRepository {
    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<Vec<ClipboardEntry>> {
        self.saves.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HistoryRepository for MockRepository {
    async fn load(&self) -> Result<Vec<ClipboardEntry>, PersistenceError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PersistenceError::Corrupt("garbage".to_string()));
        }
        Ok(self.initial.lock().unwrap().clone())
    }

    async fn save(&self, entries: &[ClipboardEntry]) -> Result<(), PersistenceError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed("disk full".to_string()));
        }
        self.saves.lock().unwrap().push(entries.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
