//! Configuration loading and exit codes shared by the entry points

use std::env;

use tracing::warn;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, LinuxConfig};
use crate::infrastructure::XdgConfigStore;

use super::args::Cli;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment override for the history file location
pub const HISTORY_ENV: &str = "CLIPMARK_HISTORY";

/// Config built from command-line flags; unset flags stay `None`
pub fn cli_config(cli: &Cli) -> AppConfig {
    AppConfig {
        capacity: cli.capacity,
        poll_interval_ms: cli.poll_interval,
        paste_delay_ms: cli.paste_delay,
        history_path: cli.history_file.clone(),
        paste: cli.no_paste.then_some(false),
        notify: cli.notify.then_some(true),
        linux: cli.keystroke_tool.clone().map(|tool| LinuxConfig {
            keystroke_tool: Some(tool),
        }),
        ..AppConfig::empty()
    }
}

fn env_config() -> AppConfig {
    AppConfig {
        history_path: env::var(HISTORY_ENV).ok().filter(|s| !s.is_empty()),
        ..AppConfig::empty()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}
