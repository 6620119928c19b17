//! Settings store persisted as a JSON file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::settings::{ConfigStore, ServerSettings, SettingsUpdate};
use crate::domain::DomainError;

/// Settings kept in a single pretty-printed JSON document
///
/// A missing file reads as empty settings and is created on first save.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<ServerSettings, DomainError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file not found, using defaults");
                return Ok(ServerSettings::default());
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            DomainError::storage(format!("Invalid settings file {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<ServerSettings, DomainError> {
        self.read().await
    }

    async fn save(&self, update: SettingsUpdate) -> Result<ServerSettings, DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut settings = self.read().await?;
        settings.apply(update);

        let content = serde_json::to_string_pretty(&settings)
            .map_err(|e| DomainError::internal(format!("Failed to encode settings: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        fs::write(&self.path, content).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        info!(path = %self.path.display(), "Settings saved");
        Ok(settings)
    }
}
