//! Infrastructure layer - Process management, persistence and logging

pub mod llama_server;
pub mod logging;
pub mod settings;
