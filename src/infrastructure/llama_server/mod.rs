//! Llama server process management

mod launch;
mod process;

pub use launch::LaunchPlan;
pub use process::ProcessServerIntegration;
