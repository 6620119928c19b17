//! Admin API wire types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, INVALID_BODY_MESSAGE};
pub use json::Json;
