//! Application configuration

mod app_config;

pub use app_config::{AppConfig, LlamaConfig, LogFormat, LoggingConfig, ServerConfig, SettingsConfig};
