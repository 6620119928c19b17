//! Resolution of a model rescan request into a server configuration

use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

pub const HOST_ENV: &str = "LLAMA_SERVER_HOST";
pub const PORT_ENV: &str = "LLAMA_SERVER_PORT";
pub const MODELS_PATH_ENV: &str = "MODELS_PATH";
pub const SERVER_PATH_ENV: &str = "LLAMA_SERVER_PATH";

/// Body of a rescan request; every field is optional
///
/// Empty strings and zero numbers count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RescanRequest {
    #[validate(length(max = 253, message = "Invalid host"))]
    pub host: Option<String>,

    #[serde(default, deserialize_with = "deserialize_port")]
    #[validate(range(max = 65535, message = "Invalid port"))]
    pub port: Option<u32>,

    pub models_path: Option<String>,

    pub llama_server_path: Option<String>,

    #[serde(rename = "ctx_size")]
    #[validate(range(min = 0, message = "Context size cannot be negative"))]
    pub ctx_size: Option<i64>,

    #[serde(rename = "batch_size")]
    #[validate(range(min = 0, message = "Batch size cannot be negative"))]
    pub batch_size: Option<i64>,

    #[validate(range(min = -1, message = "Threads must be -1 or greater"))]
    pub threads: Option<i64>,

    #[serde(rename = "gpu_layers")]
    #[validate(range(min = -1, message = "GPU layers must be -1 or greater"))]
    pub gpu_layers: Option<i64>,
}

/// Accepts `8134` or `"8134"`; an empty string is treated as absent
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortInput {
        Number(u32),
        Text(String),
    }

    match Option::<PortInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortInput::Number(port)) => Ok(Some(port)),
        Some(PortInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(PortInput::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid port: {}", text))),
    }
}

/// A single failed check on a rescan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

/// Flatten validator output into `{path, message}` entries, sorted by field
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                path: vec![field.to_string()],
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect();

    details.sort_by(|a, b| a.path.cmp(&b.path));
    details
}

/// Fallback values used when neither the request nor the environment
/// provides a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescanDefaults {
    pub host: String,
    pub port: u32,
    pub models_path: String,
    pub server_path: String,
    pub ctx_size: i64,
    pub batch_size: i64,
    pub threads: i64,
    pub gpu_layers: i64,
}

impl Default for RescanDefaults {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8134,
            models_path: "/models".to_string(),
            server_path: "/home/bamer/llama.cpp/build/bin/llama-server".to_string(),
            ctx_size: 8192,
            batch_size: 512,
            threads: -1,
            gpu_layers: -1,
        }
    }
}

/// Configuration handed to the server integration after a rescan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedServerConfig {
    pub host: String,
    pub port: u32,
    #[serde(rename = "basePath")]
    pub base_path: String,
    #[serde(rename = "serverPath")]
    pub server_path: String,
    pub ctx_size: i64,
    pub batch_size: i64,
    pub threads: i64,
    pub gpu_layers: i64,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn nonzero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

impl RescanRequest {
    /// Resolve each field from the request, then `env`, then `defaults`
    ///
    /// Only the host, port and both paths consult the environment.
    pub fn resolve<F>(&self, defaults: &RescanDefaults, env: F) -> ResolvedServerConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| present(env(key));

        ResolvedServerConfig {
            host: present(self.host.clone())
                .or_else(|| env(HOST_ENV))
                .unwrap_or_else(|| defaults.host.clone()),
            port: nonzero(self.port)
                .or_else(|| nonzero(env(PORT_ENV).and_then(|p| p.trim().parse().ok())))
                .unwrap_or(defaults.port),
            base_path: present(self.models_path.clone())
                .or_else(|| env(MODELS_PATH_ENV))
                .unwrap_or_else(|| defaults.models_path.clone()),
            server_path: present(self.llama_server_path.clone())
                .or_else(|| env(SERVER_PATH_ENV))
                .unwrap_or_else(|| defaults.server_path.clone()),
            ctx_size: nonzero(self.ctx_size).unwrap_or(defaults.ctx_size),
            batch_size: nonzero(self.batch_size).unwrap_or(defaults.batch_size),
            threads: nonzero(self.threads).unwrap_or(defaults.threads),
            gpu_layers: nonzero(self.gpu_layers).unwrap_or(defaults.gpu_layers),
        }
    }

    /// [`resolve`](Self::resolve) against the process environment
    pub fn resolve_from_env(&self, defaults: &RescanDefaults) -> ResolvedServerConfig {
        self.resolve(defaults, |key| std::env::var(key).ok())
    }
}
