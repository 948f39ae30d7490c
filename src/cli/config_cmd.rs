//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, LinuxConfig};
use crate::domain::error::ConfigError;
use crate::infrastructure::KeystrokeToolPreference;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => {
            let path = store.init().await?;
            presenter.success(&format!("Config file created at: {}", path.display()));
        }
        ConfigAction::Set { key, value } => {
            check_key(&key)?;
            let mut config = store.load().await?;
            set_value(&mut config, &key, &value)?;
            store.save(&config).await?;
            presenter.success(&format!("{} = {}", key, value));
        }
        ConfigAction::Get { key } => {
            check_key(&key)?;
            let config = store.load().await?;
            presenter.output(get_value(&config, &key).as_deref().unwrap_or(NOT_SET));
        }
        ConfigAction::List => {
            let config = store.load().await?;
            for key in VALID_CONFIG_KEYS {
                presenter.key_value(key, get_value(&config, key).as_deref().unwrap_or(NOT_SET));
            }
        }
        ConfigAction::Path => presenter.output(&store.path().to_string_lossy()),
    }
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Current value of `key` as text, `None` when unset
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "capacity" => config.capacity.map(|v| v.to_string()),
        "poll_interval_ms" => config.poll_interval_ms.map(|v| v.to_string()),
        "paste_delay_ms" => config.paste_delay_ms.map(|v| v.to_string()),
        "suppression_window_ms" => config.suppression_window_ms.map(|v| v.to_string()),
        "persist_debounce_ms" => config.persist_debounce_ms.map(|v| v.to_string()),
        "preview_length" => config.preview_length.map(|v| v.to_string()),
        "history_path" => config.history_path.clone(),
        "paste" => config.paste.map(|v| v.to_string()),
        "notify" => config.notify.map(|v| v.to_string()),
        "linux.keystroke_tool" => config.linux.as_ref().and_then(|l| l.keystroke_tool.clone()),
        _ => None,
    }
}

/// Validate `value` for `key` and store it
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    match key {
        "capacity" => config.capacity = Some(parse_positive(value).map_err(invalid)? as usize),
        "poll_interval_ms" => config.poll_interval_ms = Some(parse_positive(value).map_err(invalid)?),
        "paste_delay_ms" => config.paste_delay_ms = Some(parse_millis(value).map_err(invalid)?),
        "suppression_window_ms" => {
            config.suppression_window_ms = Some(parse_positive(value).map_err(invalid)?)
        }
        "persist_debounce_ms" => {
            config.persist_debounce_ms = Some(parse_millis(value).map_err(invalid)?)
        }
        "preview_length" => {
            config.preview_length = Some(parse_positive(value).map_err(invalid)? as usize)
        }
        "history_path" => {
            if value.trim().is_empty() {
                return Err(invalid("Path must not be empty".to_string()));
            }
            config.history_path = Some(value.to_string());
        }
        "paste" => config.paste = Some(parse_bool(value).map_err(invalid)?),
        "notify" => config.notify = Some(parse_bool(value).map_err(invalid)?),
        "linux.keystroke_tool" => {
            let tool = value
                .parse::<KeystrokeToolPreference>()
                .map_err(|e| invalid(e.to_string()))?;
            config
                .linux
                .get_or_insert_with(LinuxConfig::default)
                .keystroke_tool = Some(tool.to_string());
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err("Value must be 'true' or 'false'".to_string()),
    }
}

fn parse_millis(value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of milliseconds", value))
}

fn parse_positive(value: &str) -> Result<u64, String> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("'{}' is not a positive integer", value)),
    }
}
