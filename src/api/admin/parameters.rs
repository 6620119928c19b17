//! Parameter catalogue, validation and CLI compilation endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::parameter::{
    build_cli_args, filter_categories, split_cli_args, validate_all, validate_parameter,
    Configuration, ParameterDefinition, ParameterValue, ValidationReport, ValidationResult,
    ValidationSummary,
};

#[derive(Debug, Default, Deserialize)]
pub struct ParametersQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDefinition>,
}

#[derive(Debug, Serialize)]
pub struct ParametersResponse {
    pub total: usize,
    pub visible: usize,
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterResponse {
    #[serde(flatten)]
    pub definition: ParameterDefinition,
    pub category: String,
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRequest {
    pub config: Configuration,
}

#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: ParameterValue,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub report: ValidationReport,
    pub summary: ValidationSummary,
    /// Keys the registry does not know; they are skipped by validation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CliArgsResponse {
    /// `--flag value` tokens as compiled
    pub args: Vec<String>,
    /// Tokens split once after the flag, ready for a process spawn
    pub argv: Vec<String>,
    pub command_line: String,
}

/// Categories in declared order, optionally narrowed by `?filter=`
pub async fn list_parameters(
    State(state): State<AppState>,
    Query(query): Query<ParametersQuery>,
) -> Json<ParametersResponse> {
    let filter = query.filter.unwrap_or_default();

    let categories: Vec<CategoryResponse> = filter_categories(&state.registry, filter.trim())
        .into_iter()
        .map(|filtered| CategoryResponse {
            id: filtered.category.id.clone(),
            name: filtered.category.name.clone(),
            description: filtered.category.description.clone(),
            parameters: filtered.parameters.into_iter().cloned().collect(),
        })
        .collect();

    Json(ParametersResponse {
        total: state.registry.len(),
        visible: categories.iter().map(|c| c.parameters.len()).sum(),
        categories,
    })
}

pub async fn get_parameter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParameterResponse>, ApiError> {
    let param = state
        .registry
        .parameter(&id)
        .ok_or_else(|| ApiError::not_found(format!("Unknown parameter: {}", id)))?;

    Ok(Json(ParameterResponse {
        definition: param.definition.clone(),
        category: param.category_id.to_string(),
        category_name: param.category_name.to_string(),
    }))
}

/// Every declared default, keyed by parameter id
pub async fn get_defaults(State(state): State<AppState>) -> Json<Configuration> {
    Json(state.registry.defaults())
}

pub async fn validate_config(
    State(state): State<AppState>,
    Json(request): Json<ConfigRequest>,
) -> Json<ValidateResponse> {
    let report = validate_all(&request.config, &state.registry);
    let ignored = request
        .config
        .keys()
        .filter(|id| !state.registry.contains(id))
        .map(str::to_string)
        .collect();

    Json(ValidateResponse {
        summary: report.summary(),
        report,
        ignored,
    })
}

/// Single value check; unknown ids come back invalid rather than 404
pub async fn validate_value(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ValueRequest>,
) -> Json<ValidationResult> {
    Json(validate_parameter(&state.registry, &id, &request.value))
}

/// Compile a configuration into llama-server arguments
///
/// Invalid configurations are refused with the validation summary as details.
pub async fn cli_args(
    State(state): State<AppState>,
    Json(request): Json<ConfigRequest>,
) -> Result<Json<CliArgsResponse>, ApiError> {
    let report = validate_all(&request.config, &state.registry);
    if !report.valid {
        return Err(ApiError::bad_request("Invalid configuration").with_details(report.summary()));
    }

    let args = build_cli_args(&state.registry, &request.config);
    let argv = split_cli_args(&args);

    Ok(Json(CliArgsResponse {
        command_line: argv.join(" "),
        args,
        argv,
    }))
}
