use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Llama server error: {message}")]
    Integration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn integration(message: impl Into<String>) -> Self {
        Self::Integration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<crate::domain::parameter::RegistryError> for DomainError {
    fn from(err: crate::domain::parameter::RegistryError) -> Self {
        Self::configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::RegistryError;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Settings file missing");
        assert_eq!(error.to_string(), "Not found: Settings file missing");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_integration_error() {
        let error = DomainError::integration("stop timed out");
        assert_eq!(error.to_string(), "Llama server error: stop timed out");
    }

    #[test]
    fn test_registry_error_conversion() {
        let error: DomainError = RegistryError::DuplicateCategory("sampling".to_string()).into();
        assert!(matches!(error, DomainError::Configuration { .. }));
        assert_eq!(
            error.to_string(),
            "Configuration error: Duplicate category id: sampling"
        );
    }
}
