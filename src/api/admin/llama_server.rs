//! Llama server control endpoints

use axum::extract::State;
use serde::Serialize;
use tracing::{debug, error};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::llama_server::{field_errors, rescan_models, RescanRequest, ResolvedServerConfig};

pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Llama service not initialized";

#[derive(Debug, Serialize)]
pub struct RescanResponse {
    pub message: String,
    pub config: ResolvedServerConfig,
}

#[derive(Debug, Serialize)]
pub struct ServerStatusResponse {
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ResolvedServerConfig>,
}

/// Restart llama-server so it picks up the models directory again
pub async fn rescan(
    State(state): State<AppState>,
    Json(request): Json<RescanRequest>,
) -> Result<Json<RescanResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::invalid_body(field_errors(&e)))?;

    let Some(integration) = state.llama_integration.as_deref() else {
        return Err(ApiError::unavailable(SERVICE_UNAVAILABLE_MESSAGE));
    };

    let config = request.resolve(&state.rescan_defaults, |key| (state.env)(key));
    debug!(?config, "Resolved rescan configuration");

    let config = rescan_models(integration, config).await.map_err(|e| {
        error!(error = %e, "Rescan failed");
        ApiError::internal("Failed to rescan models")
    })?;

    Ok(Json(RescanResponse {
        message: "Models rescanned successfully".to_string(),
        config,
    }))
}

/// Configuration of the running server, if any
pub async fn status(State(state): State<AppState>) -> Result<Json<ServerStatusResponse>, ApiError> {
    let Some(integration) = state.llama_integration.as_deref() else {
        return Err(ApiError::unavailable(SERVICE_UNAVAILABLE_MESSAGE));
    };

    let config = integration.current().await;

    Ok(Json(ServerStatusResponse {
        running: config.is_some(),
        config,
    }))
}
