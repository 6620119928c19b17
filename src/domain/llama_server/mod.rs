//! Llama server rescan: request resolution and lifecycle control

mod integration;
mod rescan;

pub use integration::{rescan_models, ServerIntegration};
pub use rescan::{
    field_errors, FieldError, RescanDefaults, RescanRequest, ResolvedServerConfig, HOST_ENV,
    MODELS_PATH_ENV, PORT_ENV, SERVER_PATH_ENV,
};

#[cfg(test)]
pub use integration::MockServerIntegration;
