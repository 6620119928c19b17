//! Llama server lifecycle seam

use async_trait::async_trait;
use tracing::{error, info};

use super::rescan::ResolvedServerConfig;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Controls the llama-server process backing the admin
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServerIntegration: Send + Sync {
    /// Stops the running server, if any
    async fn stop(&self) -> Result<(), DomainError>;

    /// Starts the server with a new configuration, rescanning models
    async fn initialize(&self, config: ResolvedServerConfig) -> Result<(), DomainError>;

    /// Configuration of the running server
    async fn current(&self) -> Option<ResolvedServerConfig>;
}

/// Restart the server with `config` so it picks up the model directory again
pub async fn rescan_models(
    integration: &dyn ServerIntegration,
    config: ResolvedServerConfig,
) -> Result<ResolvedServerConfig, DomainError> {
    info!(
        host = %config.host,
        port = config.port,
        base_path = %config.base_path,
        "Rescanning models"
    );

    integration.stop().await.inspect_err(|e| {
        error!(error = %e, "Failed to stop llama server");
    })?;

    integration
        .initialize(config.clone())
        .await
        .inspect_err(|e| {
            error!(error = %e, "Failed to initialize llama server");
        })?;

    info!("Models rescanned successfully");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llama_server::{RescanDefaults, RescanRequest};
    use mockall::Sequence;

    fn resolved() -> ResolvedServerConfig {
        RescanRequest::default().resolve(&RescanDefaults::default(), |_| None)
    }

    #[tokio::test]
    async fn test_rescan_stops_then_initializes() {
        let mut seq = Sequence::new();
        let mut integration = MockServerIntegration::new();
        integration
            .expect_stop()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        integration
            .expect_initialize()
            .withf(|config| config.port == 8134 && config.base_path == "/models")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let config = rescan_models(&integration, resolved()).await.unwrap();
        assert_eq!(config, resolved());
    }

    #[tokio::test]
    async fn test_stop_failure_skips_initialize() {
        let mut integration = MockServerIntegration::new();
        integration
            .expect_stop()
            .returning(|| Err(DomainError::integration("process busy")));
        integration.expect_initialize().times(0);

        let err = rescan_models(&integration, resolved()).await.unwrap_err();
        assert!(matches!(err, DomainError::Integration { .. }));
    }

    #[tokio::test]
    async fn test_initialize_failure_propagates() {
        let mut integration = MockServerIntegration::new();
        integration.expect_stop().returning(|| Ok(()));
        integration
            .expect_initialize()
            .returning(|_| Err(DomainError::integration("binary missing")));

        let err = rescan_models(&integration, resolved()).await.unwrap_err();
        assert_eq!(err.to_string(), "Llama server error: binary missing");
    }
}
