//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;

/// Clipmark - clipboard history with markdown to rich text conversion
#[derive(Parser, Debug)]
#[command(name = "clipmark")]
#[command(version)]
#[command(about = "Clipboard history daemon that turns copied markdown into rich text")]
#[command(long_about = None)]
pub struct Cli {
    /// Run the clipboard daemon (control via: clipmark daemon / clipmark history)
    #[arg(long)]
    pub daemon: bool,

    /// Maximum number of history entries
    #[arg(long, value_name = "N", requires = "daemon")]
    pub capacity: Option<usize>,

    /// Clipboard poll interval in milliseconds
    #[arg(long, value_name = "MS", requires = "daemon")]
    pub poll_interval: Option<u64>,

    /// Delay between clipboard write and paste keystroke in milliseconds
    #[arg(long, value_name = "MS", requires = "daemon")]
    pub paste_delay: Option<u64>,

    /// Only copy entries, never replay the paste keystroke
    #[arg(long)]
    pub no_paste: bool,

    /// Keystroke tool to use (Linux: enigo, auto, ydotool, xdotool, wtype)
    #[arg(long, value_name = "TOOL")]
    pub keystroke_tool: Option<String>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// History file location
    #[arg(long, value_name = "PATH")]
    pub history_file: Option<String>,

    /// Log background activity (same as CLIPMARK_LOG=debug)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send hotkey and control commands to the running daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
    /// Browse and edit the clipboard history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Convert markdown to HTML without touching the clipboard
    Convert {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Print the plain text of the converted document instead of HTML
        #[arg(long)]
        plain: bool,
    },
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonAction {
    /// Show the history (hotkey entry point)
    Show,
    /// Paste the latest entry as rich text (hotkey entry point)
    PasteRich,
    /// Paste the latest entry as plain text (hotkey entry point)
    PastePlain,
    /// Suspend clipboard monitoring
    Pause,
    /// Resume clipboard monitoring
    Resume,
    /// Show daemon status
    Status,
    /// Stop the daemon, flushing history to disk
    Stop,
}

/// History actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// List entries, favorites first then newest first
    List {
        /// Show at most N entries
        #[arg(short = 'l', long, value_name = "N")]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Case-insensitive search in entry text
    Search {
        query: String,
        #[arg(short = 'l', long, value_name = "N")]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Toggle the favorite flag of an entry
    Favorite {
        /// Entry id or unique id prefix
        id: String,
    },
    /// Delete an entry
    Delete { id: String },
    /// Remove every entry except favorites
    Clear,
    /// Remove every entry including favorites
    ClearAll {
        /// Confirm the irreversible removal
        #[arg(long)]
        yes: bool,
    },
    /// Put an entry back on the clipboard
    Copy {
        id: String,
        /// Write plain text even when a rich representation exists
        #[arg(long)]
        plain: bool,
    },
    /// Put an entry on the clipboard and paste it into the focused window
    Paste {
        id: String,
        #[arg(long)]
        plain: bool,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Daemon settings that pick adapters rather than tune the engine
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub history_path: Option<PathBuf>,
    pub keystroke_tool: String,
    pub paste: bool,
    pub notify: bool,
}

impl DaemonOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            history_path: config.history_path(),
            keystroke_tool: config.keystroke_tool_or_default().to_string(),
            paste: config.paste_or_default(),
            notify: config.notify_or_default(),
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "capacity",
    "poll_interval_ms",
    "paste_delay_ms",
    "suppression_window_ms",
    "persist_debounce_ms",
    "preview_length",
    "history_path",
    "paste",
    "notify",
    "linux.keystroke_tool",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
