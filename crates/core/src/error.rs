//! Error taxonomy for the exchange pipeline
//!
//! Only `Transcription` is permitted to cross the pipeline boundary and reach
//! the caller's error handler. Every other variant is handled inside its own
//! stage, which degrades to a usable result instead of raising.

use thiserror::Error;

/// Errors produced by pipeline stages and their collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal: the request cannot proceed without a transcript
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Non-fatal: the affected chunk passes through untranslated
    #[error("translation failed: {0}")]
    Translation(String),

    /// Non-fatal: degrades to empty context
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    /// Non-fatal: degrades to the default apology reply
    #[error("generation failed: {0}")]
    Generation(String),

    /// Non-fatal: annotated in additional_info
    #[error("tool execution failed: {0}")]
    Tool(String),

    /// Non-fatal for chat delivery: the audio field is simply absent
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// Document upload/parse failure, surfaced on the upload endpoint only
    #[error("document processing failed: {0}")]
    Document(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Short stage label used in structured log fields
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Transcription(_) => "transcription",
            Error::Translation(_) => "translation",
            Error::Retrieval(_) => "retrieval",
            Error::Generation(_) => "generation",
            Error::Tool(_) => "tool",
            Error::Synthesis(_) => "synthesis",
            Error::Document(_) => "document",
            Error::Config(_) => "config",
        }
    }

    /// Only transcription failures abort the request
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Transcription(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transcription_is_fatal() {
        assert!(Error::Transcription("no transcript".into()).is_fatal());
        assert!(!Error::Translation("timeout".into()).is_fatal());
        assert!(!Error::Retrieval("503".into()).is_fatal());
        assert!(!Error::Synthesis("bad response".into()).is_fatal());
    }
}
