//! Error types for Roster Pulse
//!
//! The inference pipeline itself is total: malformed shapes and unparseable
//! values degrade to defaults instead of failing. Errors only surface at the
//! wire layer, where input text is not valid JSON at all.

use thiserror::Error;

/// Errors that can occur at the pipeline boundary
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse roster input: {0}")]
    Parse(String),
}
