//! Command implementations and HTTP API for the licensify tool.

pub mod commands;
mod http;

pub use commands::KeySource;
pub use http::{API_KEY_HEADER, AppState, ErrorResponse, PublicKeyResponse, SignRequest, build_router};
