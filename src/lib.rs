//! Clipmark - clipboard history with markdown to rich text conversion
//!
//! This crate watches the system clipboard, keeps a bounded history of
//! copied text, and turns copied markdown into rich text that can be
//! pasted back into applications that understand HTML.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Entries, history collection, markdown conversion, config
//! - **Application**: Watcher, history store, paste dispatcher and the port
//!   interfaces (traits) they drive
//! - **Infrastructure**: Adapters for arboard, enigo/native keystroke tools,
//!   notify-rust, the JSON history file and the TOML config file
//! - **CLI**: Argument parsing, the daemon and its socket clients

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
