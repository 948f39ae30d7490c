//! Bounded clipboard history

mod collection;

pub use collection::{AddOutcome, History, DEFAULT_CAPACITY};
