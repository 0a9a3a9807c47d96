//! Collaborator traits
//!
//! Every external service the pipeline delegates to sits behind one of these
//! traits, so the orchestrator depends only on this crate and tests can
//! substitute mocks that count calls or inject failures.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::ChatTurn;

/// Result of a speech-to-text call
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Transcribed text, possibly empty when nothing was recognized
    pub text: String,
    /// Language the service resolved, when reported
    pub language_code: Option<String>,
}

/// Speech recognition collaborator
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a WAV payload, optionally biased by a language hint
    async fn transcribe(&self, audio_wav: &[u8], language_hint: Option<&str>)
        -> Result<Transcript>;

    /// Identify the spoken language without keeping the transcript
    async fn detect_language(&self, audio_wav: &[u8]) -> Result<Option<String>>;
}

/// Translation collaborator. Callers are responsible for chunking; a single
/// call must stay within the service's per-call character budget.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, input: &str, source: &str, target: &str) -> Result<String>;
}

/// Speech synthesis collaborator. Returns one WAV payload per call.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str, speaker: &str) -> Result<Vec<u8>>;
}

/// A supporting passage cited by the retrieval assistant
#[derive(Debug, Clone, Default)]
pub struct Citation {
    /// Excerpt the assistant grounded its answer on
    pub excerpt: String,
    /// Source file name
    pub file: String,
    /// Pages within the source
    pub pages: Vec<u32>,
}

/// Answer from the retrieval assistant
#[derive(Debug, Clone, Default)]
pub struct RetrievedContext {
    pub content: String,
    pub citations: Vec<Citation>,
}

/// Managed RAG/assistant collaborator
#[async_trait]
pub trait KnowledgeAssistant: Send + Sync {
    async fn ask(&self, query: &str) -> Result<RetrievedContext>;
}

/// Reasoning (LLM) collaborator: prompt in, raw text out
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String>;
}

/// Output of the document-parsing collaborator, before markup cleanup
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Raw markup as returned by the parser
    pub raw_markup: String,
    pub pages_parsed: u32,
    pub total_pages: u32,
}

/// Document parsing collaborator (PDF and friends)
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, file_name: &str, content: &[u8], max_pages: u32)
        -> Result<ParsedDocument>;
}
