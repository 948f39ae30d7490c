//! Configuration port interface

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the stored configuration. A missing file loads as an empty
    /// config so callers can merge it over the defaults.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the configuration, creating parent directories as needed.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the configuration file.
    fn path(&self) -> PathBuf;

    /// Whether the configuration file exists.
    fn exists(&self) -> bool;

    /// Write a file populated with the defaults and return its path.
    /// Fails if the file already exists.
    async fn init(&self) -> Result<PathBuf, ConfigError>;
}
