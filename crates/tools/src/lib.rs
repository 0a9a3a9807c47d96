//! Tool dispatch for the response generator
//!
//! The reasoning collaborator can ask for one of a closed set of
//! capabilities by name. The request is represented as a tagged
//! `ToolCall { kind, parameters }`, the parameters are validated against a
//! per-kind JSON Schema before anything runs, and dispatch is an exhaustive
//! match over the kinds. There is no open-ended lookup by string.

pub mod executor;
pub mod kinds;

pub use executor::ToolRunner;
pub use kinds::{ToolCall, ToolKind};

use thiserror::Error;

/// Tool errors. All of them are non-fatal to the request; the generator
/// annotates `additional_info` instead of failing the answer.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid parameters for {tool}: {message}")]
    InvalidParameters { tool: &'static str, message: String },

    #[error("tool model call failed: {0}")]
    Model(String),

    #[error("tool output did not match its schema")]
    UnparseableOutput,
}

impl From<ToolError> for advisor_core::Error {
    fn from(err: ToolError) -> Self {
        advisor_core::Error::Tool(err.to_string())
    }
}
