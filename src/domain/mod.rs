//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod classifier;
pub mod config;
pub mod entry;
pub mod error;
pub mod history;
pub mod markdown;

// Re-export common types
pub use classifier::{classify, Classification, ContentKind};
pub use config::AppConfig;
pub use entry::{ClipboardEntry, ContentHash, EntryId};
pub use error::*;
pub use history::{AddOutcome, History};
pub use markdown::{contains_markdown, convert, RichDocument, RunStyle, TextRun};
