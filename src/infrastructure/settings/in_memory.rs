//! In-memory settings store

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::settings::{ConfigStore, ServerSettings, SettingsUpdate};
use crate::domain::DomainError;

/// Thread-safe settings store; data is lost when the process terminates
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    settings: RwLock<ServerSettings>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ServerSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load(&self) -> Result<ServerSettings, DomainError> {
        let settings = self.settings.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(settings.clone())
    }

    async fn save(&self, update: SettingsUpdate) -> Result<ServerSettings, DomainError> {
        let mut settings = self.settings.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        settings.apply(update);
        Ok(settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_starts_empty() {
        let store = InMemoryConfigStore::new();
        assert_eq!(store.load().await.unwrap(), ServerSettings::default());
    }

    #[tokio::test]
    async fn test_save_merges_halves() {
        let store = InMemoryConfigStore::new();

        store
            .save(serde_json::from_value(json!({"appConfig": {"theme": "dark"}})).unwrap())
            .await
            .unwrap();
        let saved = store
            .save(serde_json::from_value(json!({"serverConfig": {"threads": 8}})).unwrap())
            .await
            .unwrap();

        assert_eq!(saved.app_config["theme"], "dark");
        assert_eq!(saved.server_config["threads"], 8);
        assert_eq!(store.load().await.unwrap(), saved);
    }
}
