//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the daemon runner and the client commands that talk to it.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod convert_cmd;
pub mod daemon_app;
pub mod daemon_cmd;
pub mod history_cmd;
pub mod ipc;
pub mod pid_file;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{load_merged_config, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, DaemonAction, DaemonOptions, HistoryAction};
pub use daemon_app::run_daemon;
pub use daemon_cmd::handle_daemon_command;
pub use presenter::Presenter;
