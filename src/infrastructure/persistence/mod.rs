//! History persistence adapters

mod json_file;

pub use json_file::JsonHistoryFile;
