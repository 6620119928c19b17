//! Callbacks a form controller reports to

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::parameter::{Configuration, ParameterValue, ValidationReport, ValidationResult};

#[cfg(test)]
use mockall::automock;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A short message surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Metadata handed to the host alongside a saved configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyMetadata {
    /// Fields edited since the last apply or reset, in edit order
    pub changed: Vec<String>,
    pub validation: ValidationReport,
}

/// The host failed to persist a configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HostSaveError {
    message: String,
}

impl HostSaveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Embedding surface for a [`FormController`](super::FormController)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FormHost: Send + Sync {
    /// A field was edited; called before validation is scheduled
    fn on_field_change(&self, field: &str, value: &ParameterValue);

    /// A field finished validating
    fn on_validate(&self, field: &str, result: &ValidationResult);

    /// Persist a full configuration
    async fn on_apply(
        &self,
        config: &Configuration,
        metadata: &ApplyMetadata,
    ) -> Result<(), HostSaveError>;

    /// Ask the user to confirm a destructive action
    fn confirm(&self, prompt: &str) -> bool;

    fn notify(&self, notification: Notification);
}
