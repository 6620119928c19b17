//! Domain layer - Parameter engine, form controller and server settings

pub mod error;
pub mod form;
pub mod llama_server;
pub mod parameter;
pub mod settings;

pub use error::DomainError;
pub use form::{ApplyOutcome, FormController, FormHost, FormOptions, FormView, ResetOutcome};
pub use llama_server::{
    rescan_models, RescanDefaults, RescanRequest, ResolvedServerConfig, ServerIntegration,
};
pub use parameter::{
    build_cli_args, validate_all, Configuration, ParameterDefinition, ParameterRegistry,
    ParameterValue, ValidationReport, ValidationResult,
};
pub use settings::{ConfigStore, ServerSettings, SettingsUpdate};
