//! Settings store implementations

mod file;
mod form_host;
mod in_memory;

use std::sync::Arc;

pub use file::FileConfigStore;
pub use form_host::StoreFormHost;
pub use in_memory::InMemoryConfigStore;

use crate::config::SettingsConfig;
use crate::domain::settings::ConfigStore;

/// File-backed store when a path is configured, in-memory otherwise
pub fn create_config_store(config: &SettingsConfig) -> Arc<dyn ConfigStore> {
    match &config.path {
        Some(path) => Arc::new(FileConfigStore::new(path)),
        None => Arc::new(InMemoryConfigStore::new()),
    }
}
