//! TOML config file under `$XDG_CONFIG_HOME/clipmark/`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

const HEADER: &str = "# clipmark configuration\n\
# Keys left out fall back to built-in defaults; CLIPMARK_HISTORY and\n\
# command-line flags override this file.\n\n";

pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("clipmark")
            .join("config.toml")
    }

    fn display(path: &Path) -> String {
        path.display().to_string()
    }

    fn decode(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    fn encode(config: &AppConfig) -> Result<String, ConfigError> {
        let body = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Ok(format!("{HEADER}{body}"))
    }

    fn unwritable(&self, e: std::io::Error) -> ConfigError {
        ConfigError::Unwritable {
            path: Self::display(&self.path),
            message: e.to_string(),
        }
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Self::decode(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AppConfig::empty()),
            Err(e) => Err(ConfigError::Unreadable {
                path: Self::display(&self.path),
                message: e.to_string(),
            }),
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = Self::encode(config)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| self.unwritable(e))?;
        }
        fs::write(&self.path, content)
            .await
            .map_err(|e| self.unwritable(e))
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    async fn init(&self) -> Result<PathBuf, ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(Self::display(&self.path)));
        }
        self.save(&AppConfig::defaults()).await?;
        Ok(self.path())
    }
}
