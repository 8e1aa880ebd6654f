//! HTTP protocol layer module
//!
//! Provides HTTP response-building functionality, decoupled from specific
//! business logic.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_json_response,
    build_metrics_response, build_options_response,
};
