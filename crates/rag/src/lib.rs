//! Retrieval support
//!
//! - `AssistantClient`: the managed RAG assistant, queried chat-style
//! - `DocumentAnalyzer`: turns parsed document markup into the cached
//!   `DocumentContext` (cleanup, field extraction, summary excerpt)

pub mod assistant;
pub mod document;

pub use assistant::AssistantClient;
pub use document::DocumentAnalyzer;

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("network error: {0}")]
    Network(String),

    #[error("assistant returned status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        RagError::Network(err.to_string())
    }
}

impl From<RagError> for advisor_core::Error {
    fn from(err: RagError) -> Self {
        advisor_core::Error::Retrieval(err.to_string())
    }
}
