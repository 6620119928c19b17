//! Llama server integration backed by a child process

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::launch::LaunchPlan;
use crate::domain::llama_server::{ResolvedServerConfig, ServerIntegration};
use crate::domain::parameter::ParameterRegistry;
use crate::domain::DomainError;

struct RunningServer {
    config: ResolvedServerConfig,
    child: Child,
}

/// Starts and stops a local llama-server binary
pub struct ProcessServerIntegration {
    registry: Arc<ParameterRegistry>,
    running: Mutex<Option<RunningServer>>,
}

impl ProcessServerIntegration {
    pub fn new(registry: Arc<ParameterRegistry>) -> Self {
        Self {
            registry,
            running: Mutex::new(None),
        }
    }

    pub fn plan(&self, config: &ResolvedServerConfig) -> LaunchPlan {
        LaunchPlan::new(&self.registry, config)
    }
}

#[async_trait]
impl ServerIntegration for ProcessServerIntegration {
    async fn stop(&self) -> Result<(), DomainError> {
        let Some(mut server) = self.running.lock().await.take() else {
            debug!("No llama server running");
            return Ok(());
        };

        if let Ok(Some(status)) = server.child.try_wait() {
            info!(%status, "Llama server had already exited");
            return Ok(());
        }

        server.child.start_kill().map_err(|e| {
            DomainError::integration(format!("Failed to stop llama server: {}", e))
        })?;

        let status = server.child.wait().await.map_err(|e| {
            DomainError::integration(format!("Failed to wait for llama server: {}", e))
        })?;

        info!(%status, port = server.config.port, "Llama server stopped");
        Ok(())
    }

    async fn initialize(&self, config: ResolvedServerConfig) -> Result<(), DomainError> {
        let mut running = self.running.lock().await;

        if let Some(mut previous) = running.take() {
            warn!("Replacing a llama server that was not stopped");
            let _ = previous.child.start_kill();
            let _ = previous.child.wait().await;
        }

        let plan = self.plan(&config);
        info!(command = %plan.command_line(), "Starting llama server");

        let child = Command::new(&plan.program)
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DomainError::integration(format!("Failed to start {}: {}", plan.program, e))
            })?;

        debug!(pid = ?child.id(), "Llama server spawned");
        *running = Some(RunningServer { config, child });
        Ok(())
    }

    async fn current(&self) -> Option<ResolvedServerConfig> {
        self.running
            .lock()
            .await
            .as_ref()
            .map(|server| server.config.clone())
    }
}
