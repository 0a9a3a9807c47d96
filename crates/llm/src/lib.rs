//! Reasoning collaborator integration
//!
//! - `GroqBackend`: OpenAI-compatible chat-completions client
//! - `PromptBuilder`: assembles the generation prompt (persona/scope,
//!   history, context, query, output-shape instruction)
//! - `parse`: strict parse-or-default decoding of structured replies
//! - `ConfidenceScorer`: second-opinion scoring of generated answers

pub mod backend;
pub mod confidence;
pub mod parse;
pub mod prompt;

pub use backend::GroqBackend;
pub use confidence::ConfidenceScorer;
pub use parse::{parse_reply, parse_reply_or_default};
pub use prompt::PromptBuilder;

use thiserror::Error;

/// Reasoning collaborator errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error: status {0}")]
    Api(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for advisor_core::Error {
    fn from(err: LlmError) -> Self {
        advisor_core::Error::Generation(err.to_string())
    }
}
