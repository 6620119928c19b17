//! Shared state for HTTP handlers

use std::sync::Arc;

use crate::domain::llama_server::{RescanDefaults, ServerIntegration};
use crate::domain::parameter::ParameterRegistry;
use crate::domain::settings::ConfigStore;

/// Environment variable lookup used when resolving rescans
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ParameterRegistry>,
    pub config_store: Arc<dyn ConfigStore>,
    /// `None` until a llama server integration is wired in
    pub llama_integration: Option<Arc<dyn ServerIntegration>>,
    pub rescan_defaults: Arc<RescanDefaults>,
    pub env: EnvLookup,
}

impl AppState {
    /// State without a llama integration, reading the process environment
    pub fn new(registry: Arc<ParameterRegistry>, config_store: Arc<dyn ConfigStore>) -> Self {
        Self {
            registry,
            config_store,
            llama_integration: None,
            rescan_defaults: Arc::new(RescanDefaults::default()),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    pub fn with_llama_integration(mut self, integration: Arc<dyn ServerIntegration>) -> Self {
        self.llama_integration = Some(integration);
        self
    }

    pub fn with_rescan_defaults(mut self, defaults: RescanDefaults) -> Self {
        self.rescan_defaults = Arc::new(defaults);
        self
    }

    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }
}
