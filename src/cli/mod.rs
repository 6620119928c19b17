//! CLI module for llama-admin
//!
//! Provides subcommands for running the admin API and working with
//! parameter configurations offline:
//! - `serve`: HTTP admin API
//! - `args`: compile a configuration into llama-server arguments
//! - `validate`: validate a configuration and print the report
//! - `params`: list the parameter catalogue
//! - `set`: edit and apply stored server parameters

pub mod args;
pub mod params;
pub mod serve;
pub mod set;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config::AppConfig;
use crate::domain::parameter::{Configuration, ParameterRegistry};
use crate::infrastructure::settings::create_config_store;

/// llama-admin - Parameter configuration for a local llama.cpp server
#[derive(Parser)]
#[command(name = "llama-admin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP admin API
    Serve,

    /// Print the llama-server arguments for a configuration
    Args(args::ArgsArgs),

    /// Validate a configuration and print the report as JSON
    Validate(validate::ValidateArgs),

    /// List the parameter catalogue
    Params(params::ParamsArgs),

    /// Change stored server parameters
    Set(set::SetArgs),
}

/// Where a one-shot command reads its configuration from
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// JSON file holding a parameter map or a stored `{serverConfig}` document;
    /// the settings store is used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConfigSource {
    pub async fn load(&self) -> anyhow::Result<Configuration> {
        match &self.config {
            Some(path) => read_configuration(path).await,
            None => {
                let store = create_config_store(&load_app_config().settings);
                let settings = store.load().await?;
                settings
                    .parameters()
                    .context("Stored server config is not a parameter map")
            }
        }
    }
}

/// Parse a configuration file
///
/// Accepts a bare `{id: value}` map or a settings document whose
/// `serverConfig` holds the map.
pub async fn read_configuration(path: &Path) -> anyhow::Result<Configuration> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_configuration(&contents).with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn parse_configuration(contents: &str) -> anyhow::Result<Configuration> {
    let mut document: Value = serde_json::from_str(contents)?;

    if let Some(server_config) = document.get_mut("serverConfig") {
        return Ok(serde_json::from_value(server_config.take())?);
    }

    Ok(serde_json::from_value(document)?)
}

pub(crate) fn load_app_config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::load().unwrap_or_default()
}

pub(crate) fn registry() -> anyhow::Result<Arc<ParameterRegistry>> {
    Ok(Arc::new(ParameterRegistry::llama_cpp()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::ParameterValue;

    #[test]
    fn test_parse_bare_map() {
        let config = parse_configuration(r#"{"ctx-size": 4096, "mlock": true}"#).unwrap();

        assert_eq!(config.get("ctx-size"), Some(&ParameterValue::from(4096)));
        assert_eq!(config.get("mlock"), Some(&ParameterValue::from(true)));
    }

    #[test]
    fn test_parse_settings_document() {
        let config = parse_configuration(
            r#"{"serverConfig": {"temp": 0.5}, "appConfig": {"theme": "dark"}}"#,
        )
        .unwrap();

        assert_eq!(config.len(), 1);
        assert_eq!(config.get("temp"), Some(&ParameterValue::from(0.5)));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_configuration("[1, 2]").is_err());
        assert!(parse_configuration("not json").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["llama-admin", "args", "--config", "server.json"]).unwrap();
        match cli.command {
            Command::Args(args) => {
                assert_eq!(args.source.config, Some(PathBuf::from("server.json")));
            }
            _ => panic!("expected args command"),
        }

        let cli = Cli::try_parse_from(["llama-admin", "set", "temp=0.5", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Set(_)));
    }
}
