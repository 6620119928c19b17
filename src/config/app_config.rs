use serde::Deserialize;

use crate::domain::llama_server::RescanDefaults;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub llama: LlamaConfig,
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allow cross-origin requests from the browser admin UI
    pub cors_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Fallbacks for llama-server rescans
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlamaConfig {
    pub host: String,
    pub port: u32,
    pub models_path: String,
    pub server_path: String,
    pub ctx_size: i64,
    pub batch_size: i64,
    pub threads: i64,
    pub gpu_layers: i64,
    /// Start llama-server with the resolved defaults when the API boots
    pub autostart: bool,
}

/// Where admin settings are persisted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// JSON file backing the settings store; in-memory when unset
    pub path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlamaConfig {
    fn default() -> Self {
        let defaults = RescanDefaults::default();

        Self {
            host: defaults.host,
            port: defaults.port,
            models_path: defaults.models_path,
            server_path: defaults.server_path,
            ctx_size: defaults.ctx_size,
            batch_size: defaults.batch_size,
            threads: defaults.threads,
            gpu_layers: defaults.gpu_layers,
            autostart: false,
        }
    }
}

impl From<&LlamaConfig> for RescanDefaults {
    fn from(config: &LlamaConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            models_path: config.models_path.clone(),
            server_path: config.server_path.clone(),
            ctx_size: config.ctx_size,
            batch_size: config.batch_size,
            threads: config.threads,
            gpu_layers: config.gpu_layers,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
