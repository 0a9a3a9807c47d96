//! Speech and language service clients
//!
//! One HTTP client for the vendor that hosts speech-to-text, language
//! detection, text-to-speech, translation, and document parsing behind a
//! single subscription key. Each capability implements the matching
//! collaborator trait from `advisor-core`, so the pipeline never sees
//! the wire format.

pub mod client;
pub mod parse;
pub mod stt;
pub mod translate;
pub mod tts;

pub use client::SarvamClient;

use thiserror::Error;

/// Transport-level errors shared by all capabilities of the client
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("network error: {0}")]
    Network(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Network(err.to_string())
    }
}
