//! Conversational Exchange Pipeline
//!
//! Five stages composed in strict sequence per inbound message:
//! normalize → bridge in → retrieve → generate → bridge out → render.
//! Only the normalizer may fail the request (a missing transcript); every
//! later stage degrades to a usable result instead of raising.

pub mod bridge;
pub mod context;
pub mod generate;
pub mod normalize;
pub mod orchestrator;
pub mod render;
pub mod state;

pub use bridge::{sentence_chunks, LanguageBridge};
pub use context::ContextStage;
pub use generate::{GeneratedAnswer, ResponseGenerator};
pub use normalize::{InboundPayload, InputNormalizer, NormalizedInput};
pub use orchestrator::{Collaborators, ExchangeOutcome, ExchangePipeline};
pub use render::{chat_markdown, messaging_segments, messaging_text, speech_chunks};
pub use state::RequestTrace;
