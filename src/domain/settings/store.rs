//! Settings store trait

use async_trait::async_trait;

use super::{ServerSettings, SettingsUpdate};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for [`ServerSettings`]
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Loads the stored settings, empty halves on first run
    async fn load(&self) -> Result<ServerSettings, DomainError>;

    /// Applies a partial update and returns the stored result
    async fn save(&self, update: SettingsUpdate) -> Result<ServerSettings, DomainError>;
}
