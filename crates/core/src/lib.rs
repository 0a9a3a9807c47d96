//! Core types and traits for the loan advisor backend
//!
//! This crate provides the foundation shared by all other crates:
//! - Collaborator traits for the external services the pipeline delegates to
//!   (speech recognition/synthesis, translation, retrieval, reasoning)
//! - Conversation and structured-reply types
//! - Language tag helpers and the language-to-voice mapping
//! - Audio helpers (WAV concatenation)
//! - Error taxonomy

pub mod audio;
pub mod document;
pub mod error;
pub mod language;
pub mod message;
pub mod reply;
pub mod traits;

pub use audio::concat_wav;
pub use document::DocumentContext;
pub use error::{Error, Result};
pub use language::{is_english, speaker_for, DEFAULT_LANGUAGE, REASONING_LANGUAGE};
pub use message::{ChatMessage, ChatRole, ChatTurn};
pub use reply::AdvisorReply;
pub use traits::{
    Citation, DocumentParser, KnowledgeAssistant, ParsedDocument, ReasoningModel,
    RetrievedContext, SpeechSynthesizer, SpeechToText, Transcript, Translator,
};
