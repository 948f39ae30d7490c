//! JSON history file adapter

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::application::ports::{HistoryRepository, PersistenceError};
use crate::domain::entry::ClipboardEntry;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct HistoryFileRef<'a> {
    version: u32,
    entries: &'a [ClipboardEntry],
}

#[derive(Deserialize)]
struct HistoryFile {
    version: u32,
    entries: Vec<ClipboardEntry>,
}

/// History stored as one JSON document.
///
/// Writes go to a sibling temp file that is renamed over the target, so
/// a crash mid-write never leaves a truncated history behind.
pub struct JsonHistoryFile {
    path: PathBuf,
}

impl JsonHistoryFile {
    /// Store at the default location (`$XDG_DATA_HOME/clipmark/history.json`)
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("clipmark")
            .join("history.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn decode(content: &str) -> Result<Vec<ClipboardEntry>, PersistenceError> {
        let file: HistoryFile =
            serde_json::from_str(content).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        if file.version > FORMAT_VERSION {
            return Err(PersistenceError::Corrupt(format!(
                "unsupported format version {}",
                file.version
            )));
        }
        Ok(file.entries)
    }
}

impl Default for JsonHistoryFile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryFile {
    async fn load(&self) -> Result<Vec<ClipboardEntry>, PersistenceError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::ReadFailed(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Self::decode(&content)
    }

    async fn save(&self, entries: &[ClipboardEntry]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::WriteFailed(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&HistoryFileRef {
            version: FORMAT_VERSION,
            entries,
        })
        .map_err(|e| PersistenceError::WriteFailed(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, content)
            .await
            .map_err(|e| PersistenceError::WriteFailed(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| PersistenceError::WriteFailed(e.to_string()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classifier::classify;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> JsonHistoryFile {
        JsonHistoryFile::with_path(dir.path().join("nested").join("history.json"))
    }

    #[test]
    fn default_path_is_under_data_dir() {
        let path = JsonHistoryFile::default_path();
        assert!(path.ends_with("clipmark/history.json"));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_keeps_every_field() {
        let dir = TempDir::new().unwrap();
        let file = store(&dir);

        let mut favorite = ClipboardEntry::new("# Title", classify("# Title").rich);
        favorite.toggle_favorite();
        let entries = vec![ClipboardEntry::new("plain", None), favorite];

        file.save(&entries).await.unwrap();
        let loaded = file.load().await.unwrap();

        assert_eq!(loaded, entries);
        assert!(!file.temp_path().exists());
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let file = JsonHistoryFile::with_path(dir.path().join("history.json"));
        std::fs::write(file.path(), "{ not json").unwrap();

        assert!(matches!(
            file.load().await,
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn newer_format_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = JsonHistoryFile::with_path(dir.path().join("history.json"));
        std::fs::write(file.path(), r#"{"version": 99, "entries": []}"#).unwrap();

        assert!(matches!(
            file.load().await,
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn save_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let file = store(&dir);

        file.save(&[ClipboardEntry::new("old", None)]).await.unwrap();
        file.save(&[]).await.unwrap();

        assert!(file.load().await.unwrap().is_empty());
    }
}
