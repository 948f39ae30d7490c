//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entry::DEFAULT_PREVIEW_LENGTH;
use crate::domain::history::DEFAULT_CAPACITY;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_PASTE_DELAY_MS: u64 = 150;
pub const DEFAULT_SUPPRESSION_WINDOW_MS: u64 = 1500;
pub const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 500;

/// Linux-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinuxConfig {
    pub keystroke_tool: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub capacity: Option<usize>,
    pub poll_interval_ms: Option<u64>,
    pub paste_delay_ms: Option<u64>,
    pub suppression_window_ms: Option<u64>,
    pub persist_debounce_ms: Option<u64>,
    pub preview_length: Option<usize>,
    pub history_path: Option<String>,
    pub paste: Option<bool>,
    pub notify: Option<bool>,
    pub linux: Option<LinuxConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            capacity: Some(DEFAULT_CAPACITY),
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            paste_delay_ms: Some(DEFAULT_PASTE_DELAY_MS),
            suppression_window_ms: Some(DEFAULT_SUPPRESSION_WINDOW_MS),
            persist_debounce_ms: Some(DEFAULT_PERSIST_DEBOUNCE_MS),
            preview_length: Some(DEFAULT_PREVIEW_LENGTH),
            history_path: None,
            paste: Some(true),
            notify: Some(false),
            linux: Some(LinuxConfig {
                keystroke_tool: Some("enigo".to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            capacity: other.capacity.or(self.capacity),
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            paste_delay_ms: other.paste_delay_ms.or(self.paste_delay_ms),
            suppression_window_ms: other.suppression_window_ms.or(self.suppression_window_ms),
            persist_debounce_ms: other.persist_debounce_ms.or(self.persist_debounce_ms),
            preview_length: other.preview_length.or(self.preview_length),
            history_path: other.history_path.or(self.history_path),
            paste: other.paste.or(self.paste),
            notify: other.notify.or(self.notify),
            linux: Self::merge_linux_config(self.linux, other.linux),
        }
    }

    /// Merge Linux config sections
    fn merge_linux_config(
        base: Option<LinuxConfig>,
        other: Option<LinuxConfig>,
    ) -> Option<LinuxConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(LinuxConfig {
                keystroke_tool: o.keystroke_tool.or(b.keystroke_tool),
            }),
        }
    }

    /// History capacity, never below one
    pub fn capacity_or_default(&self) -> usize {
        self.capacity.unwrap_or(DEFAULT_CAPACITY).max(1)
    }

    pub fn poll_interval_ms_or_default(&self) -> u64 {
        self.poll_interval_ms
            .filter(|&ms| ms > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn paste_delay_ms_or_default(&self) -> u64 {
        self.paste_delay_ms.unwrap_or(DEFAULT_PASTE_DELAY_MS)
    }

    pub fn suppression_window_ms_or_default(&self) -> u64 {
        self.suppression_window_ms
            .unwrap_or(DEFAULT_SUPPRESSION_WINDOW_MS)
    }

    pub fn persist_debounce_ms_or_default(&self) -> u64 {
        self.persist_debounce_ms
            .unwrap_or(DEFAULT_PERSIST_DEBOUNCE_MS)
    }

    pub fn preview_length_or_default(&self) -> usize {
        self.preview_length
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PREVIEW_LENGTH)
    }

    /// Configured history file, if any
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_path
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    /// Get paste setting (replay keystroke after copy), or true if not set
    pub fn paste_or_default(&self) -> bool {
        self.paste.unwrap_or(true)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get keystroke tool preference, or "enigo" if not set
    pub fn keystroke_tool_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.keystroke_tool.as_deref())
            .unwrap_or("enigo")
    }
}
