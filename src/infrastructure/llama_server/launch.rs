//! Command line for a llama-server process

use crate::domain::llama_server::ResolvedServerConfig;
use crate::domain::parameter::{build_cli_args, split_cli_args, Configuration, ParameterRegistry};

/// Program and argv used to start llama-server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchPlan {
    /// Networking and model directory flags first, then the tuning
    /// parameters compiled through the registry
    pub fn new(registry: &ParameterRegistry, config: &ResolvedServerConfig) -> Self {
        let parameters = Configuration::new()
            .with("ctx-size", config.ctx_size)
            .with("batch", config.batch_size)
            .with("threads", config.threads)
            .with("n-gpu-layers", config.gpu_layers);

        let mut args = vec![
            "--host".to_string(),
            config.host.clone(),
            "--port".to_string(),
            config.port.to_string(),
            "--models-dir".to_string(),
            config.base_path.clone(),
        ];
        args.extend(split_cli_args(&build_cli_args(registry, &parameters)));

        Self {
            program: config.server_path.clone(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
