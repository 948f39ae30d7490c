//! Content classification for captured clipboard payloads

use crate::domain::markdown::{convert_if_markdown, RichDocument};

/// What kind of content a payload carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Nothing worth recording (empty or whitespace only)
    Empty,
    /// Plain text, possibly with markdown
    PlainText,
    /// Text that already is markup (HTML or RTF source)
    Rich,
}

/// Result of classifying a payload
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: ContentKind,
    /// Converted document, present only for plain text with markdown
    pub rich: Option<RichDocument>,
}

impl Classification {
    pub fn has_markdown(&self) -> bool {
        self.rich.is_some()
    }

    /// Whether the payload should become a history entry
    pub fn is_recordable(&self) -> bool {
        self.kind != ContentKind::Empty
    }
}

/// Classify a text payload and convert it when it carries markdown
pub fn classify(text: &str) -> Classification {
    let kind = detect_kind(text);
    let rich = match kind {
        ContentKind::PlainText => convert_if_markdown(text),
        ContentKind::Empty | ContentKind::Rich => None,
    };
    Classification { kind, rich }
}

fn detect_kind(text: &str) -> ContentKind {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return ContentKind::Empty;
    }
    if looks_like_markup(trimmed) {
        return ContentKind::Rich;
    }
    ContentKind::PlainText
}

fn looks_like_markup(text: &str) -> bool {
    if text.starts_with("{\\rtf") {
        return true;
    }

    let head: String = text.chars().take(16).collect::<String>().to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html") || head.starts_with("<meta")
}
