//! Clipboard entry entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::content_hash::ContentHash;
use crate::domain::markdown::RichDocument;

/// Default number of characters kept in a preview
pub const DEFAULT_PREVIEW_LENGTH: usize = 100;

/// Unique, stable identity of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to address an entry interactively
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Error when parsing an entry id
#[derive(Debug, Clone, Error)]
#[error("Invalid entry id: \"{input}\"")]
pub struct ParseEntryIdError {
    pub input: String,
}

impl FromStr for EntryId {
    type Err = ParseEntryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ParseEntryIdError {
                input: s.to_string(),
            })
    }
}

/// One recorded clipboard capture.
///
/// Everything except the favorite flag is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    id: EntryId,
    raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rich: Option<RichDocument>,
    content_hash: ContentHash,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    is_favorite: bool,
    preview: String,
}

impl ClipboardEntry {
    /// Create an entry captured now
    pub fn new(raw_text: impl Into<String>, rich: Option<RichDocument>) -> Self {
        Self::captured_at(raw_text, rich, Utc::now(), DEFAULT_PREVIEW_LENGTH)
    }

    /// Create an entry with an explicit capture time and preview length
    pub fn captured_at(
        raw_text: impl Into<String>,
        rich: Option<RichDocument>,
        timestamp: DateTime<Utc>,
        preview_length: usize,
    ) -> Self {
        let raw_text = raw_text.into();
        Self {
            id: EntryId::new(),
            content_hash: ContentHash::of(&raw_text),
            preview: make_preview(&raw_text, preview_length),
            raw_text,
            rich,
            timestamp,
            is_favorite: false,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn rich(&self) -> Option<&RichDocument> {
        self.rich.as_ref()
    }

    /// Whether a converted rich representation exists
    pub fn has_rich(&self) -> bool {
        self.rich.is_some()
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Capture time in local time: `HH:MM` for today, else `YYYY-MM-DD HH:MM`
    pub fn formatted_timestamp(&self) -> String {
        let local = self.timestamp.with_timezone(&Local);
        if local.date_naive() == Local::now().date_naive() {
            local.format("%H:%M").to_string()
        } else {
            local.format("%Y-%m-%d %H:%M").to_string()
        }
    }

    pub(crate) fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
    }
}

/// Collapse whitespace runs to single spaces and truncate to `max_chars`.
pub fn make_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut preview: String = collapsed.chars().take(max_chars).collect();
    preview.truncate(preview.trim_end().len());
    preview.push('…');
    preview
}
