//! llama-admin
//!
//! Parameter configuration engine for a local llama.cpp inference server:
//! - A typed catalogue of llama-server parameters with validation rules
//! - Compilation of a configuration into llama-server arguments
//! - A form controller with debounced validation and apply/reset flows
//! - An HTTP admin API for stored settings and model rescans

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::llama_server::RescanDefaults;
use domain::parameter::ParameterRegistry;
use infrastructure::llama_server::ProcessServerIntegration;
use infrastructure::settings::create_config_store;
use tracing::info;

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry = Arc::new(ParameterRegistry::llama_cpp()?);
    info!(parameters = registry.len(), "Parameter registry loaded");

    let config_store = create_config_store(&config.settings);
    match &config.settings.path {
        Some(path) => info!(path = %path, "Settings stored on disk"),
        None => info!("Settings stored in memory"),
    }

    let integration = Arc::new(ProcessServerIntegration::new(registry.clone()));

    Ok(AppState::new(registry, config_store)
        .with_llama_integration(integration)
        .with_rescan_defaults(RescanDefaults::from(&config.llama)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_defaults() {
        let state = create_app_state(&AppConfig::default()).unwrap();

        assert_eq!(state.registry.len(), 30);
        assert!(state.llama_integration.is_some());
        assert_eq!(*state.rescan_defaults, RescanDefaults::default());
        assert!(state.config_store.load().await.unwrap().server_config.is_empty());
    }
}
