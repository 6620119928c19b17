//! Form host that saves applied parameters to a settings store

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::form::{ApplyMetadata, FormHost, HostSaveError, Notification, NotificationLevel};
use crate::domain::parameter::{Configuration, ParameterValue, ValidationResult};
use crate::domain::settings::{ConfigStore, SettingsUpdate};

/// Persists the server half of the settings and reports through tracing
pub struct StoreFormHost {
    store: Arc<dyn ConfigStore>,
    assume_yes: bool,
}

impl StoreFormHost {
    /// `assume_yes` answers every confirmation prompt
    pub fn new(store: Arc<dyn ConfigStore>, assume_yes: bool) -> Self {
        Self { store, assume_yes }
    }
}

#[async_trait]
impl FormHost for StoreFormHost {
    fn on_field_change(&self, field: &str, value: &ParameterValue) {
        debug!(field = %field, value = %value, "Field changed");
    }

    fn on_validate(&self, field: &str, result: &ValidationResult) {
        if !result.valid {
            warn!(field = %field, errors = ?result.errors, "Field invalid");
        }
    }

    async fn on_apply(
        &self,
        config: &Configuration,
        metadata: &ApplyMetadata,
    ) -> Result<(), HostSaveError> {
        let update = SettingsUpdate::server(config)
            .map_err(|e| HostSaveError::new(format!("Failed to encode parameters: {}", e)))?;

        self.store
            .save(update)
            .await
            .map_err(|e| HostSaveError::new(e.to_string()))?;

        info!(changed = ?metadata.changed, "Server parameters saved");
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> bool {
        debug!(prompt = %prompt, answer = self.assume_yes, "Confirmation requested");
        self.assume_yes
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                info!("{}", notification.message)
            }
            NotificationLevel::Warning => warn!("{}", notification.message),
            NotificationLevel::Error => error!("{}", notification.message),
        }
    }
}
