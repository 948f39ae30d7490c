//! Clipboard history entries

mod clipboard_entry;
mod content_hash;

pub use clipboard_entry::{
    make_preview, ClipboardEntry, EntryId, ParseEntryIdError, DEFAULT_PREVIEW_LENGTH,
};
pub use content_hash::ContentHash;
