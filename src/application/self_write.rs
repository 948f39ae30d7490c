//! Suppression of clipboard changes made by the engine itself

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::entry::ContentHash;

/// Remembers the hash of the last dispatcher write for a short window.
///
/// The watcher consults it before ingesting a payload, so writing an
/// existing entry back to the clipboard never records a new one.
#[derive(Debug)]
pub struct SelfWriteGuard {
    window: Duration,
    armed: Mutex<Option<(ContentHash, Instant)>>,
}

impl SelfWriteGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a write that is about to happen
    pub fn arm(&self, hash: ContentHash) {
        if let Ok(mut armed) = self.armed.lock() {
            *armed = Some((hash, Instant::now() + self.window));
        }
    }

    /// Forget the armed hash (the write failed)
    pub fn disarm(&self) {
        if let Ok(mut armed) = self.armed.lock() {
            *armed = None;
        }
    }

    /// Whether an observed payload is our own recent write
    pub fn is_suppressed(&self, hash: &ContentHash) -> bool {
        let Ok(mut armed) = self.armed.lock() else {
            return false;
        };
        match armed.as_ref() {
            Some((_, expires)) if Instant::now() >= *expires => {
                *armed = None;
                false
            }
            Some((armed_hash, _)) => armed_hash == hash,
            None => false,
        }
    }
}
