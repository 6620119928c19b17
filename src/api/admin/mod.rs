//! Admin API endpoints for settings, parameters and the llama server

pub mod config;
pub mod llama_server;
pub mod parameters;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Stored settings
        .route("/config", get(config::get_config).post(config::save_config))
        // Parameter catalogue
        .route("/parameters", get(parameters::list_parameters))
        .route("/parameters/defaults", get(parameters::get_defaults))
        .route("/parameters/validate", post(parameters::validate_config))
        .route("/parameters/cli-args", post(parameters::cli_args))
        .route("/parameters/{param_id}", get(parameters::get_parameter))
        .route(
            "/parameters/{param_id}/validate",
            post(parameters::validate_value),
        )
        // Llama server
        .route("/llama-server", get(llama_server::status))
        .route("/llama-server/rescan", post(llama_server::rescan))
}
