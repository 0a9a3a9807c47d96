//! Pipeline orchestration
//!
//! Wires the five stages together and runs one inbound message end-to-end.
//! Each request runs on its own task; the only shared state is the session
//! store and the query log.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use advisor_config::constants::{document, responses, tts};
use advisor_config::PipelineConfig;
use advisor_core::{
    concat_wav, language, ChatMessage, DocumentContext, DocumentParser, Error, KnowledgeAssistant,
    ReasoningModel, Result, SpeechSynthesizer, SpeechToText, Translator,
};
use advisor_rag::DocumentAnalyzer;
use advisor_store::{QueryLog, SessionStore};

use crate::bridge::LanguageBridge;
use crate::context::ContextStage;
use crate::generate::ResponseGenerator;
use crate::normalize::{InboundPayload, InputNormalizer};
use crate::render;
use crate::state::{RequestState, RequestTrace};

/// The external services one pipeline instance delegates to
pub struct Collaborators {
    pub stt: Arc<dyn SpeechToText>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub reasoning: Arc<dyn ReasoningModel>,
    pub assistant: Option<Arc<dyn KnowledgeAssistant>>,
    pub document_parser: Option<Arc<dyn DocumentParser>>,
}

/// Final result of one exchange, ready for delivery
#[derive(Debug)]
pub struct ExchangeOutcome {
    /// Rendered answer in the user's language
    pub text: String,
    pub language: String,
    /// Concatenated WAV when voice delivery was requested and succeeded
    pub audio_wav: Option<Vec<u8>>,
    /// Advisory confidence score, when scoring is enabled
    pub confidence: Option<u8>,
    /// Language identified by auto-detection, when it ran
    pub detected_language: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The Conversational Exchange Pipeline
pub struct ExchangePipeline {
    normalizer: InputNormalizer,
    bridge: LanguageBridge,
    context: ContextStage,
    generator: ResponseGenerator,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    document_parser: Option<Arc<dyn DocumentParser>>,
    store: Arc<SessionStore>,
    queries: Arc<QueryLog>,
}

impl ExchangePipeline {
    pub fn new(
        collaborators: Collaborators,
        store: Arc<SessionStore>,
        queries: Arc<QueryLog>,
        config: &PipelineConfig,
    ) -> Self {
        let mut generator =
            ResponseGenerator::new(collaborators.reasoning.clone(), &config.agent_name);
        if config.confidence_enabled {
            generator = generator.with_confidence();
        }

        Self {
            normalizer: InputNormalizer::new(collaborators.stt, store.clone()),
            bridge: LanguageBridge::new(collaborators.translator),
            context: ContextStage::new(collaborators.assistant, store.clone()),
            generator,
            synthesizer: collaborators.synthesizer,
            document_parser: collaborators.document_parser,
            store,
            queries,
        }
    }

    /// Handle a text message from the chat or messaging front end
    pub async fn handle_text(
        &self,
        session_id: &str,
        text: &str,
        language_hint: Option<&str>,
        want_audio: bool,
    ) -> Result<ExchangeOutcome> {
        self.process(
            session_id,
            InboundPayload::Text(text.to_string()),
            language_hint,
            false,
            want_audio,
        )
        .await
    }

    /// Handle a voice message; the reply always carries audio when
    /// synthesis succeeds
    pub async fn handle_audio(
        &self,
        session_id: &str,
        audio_base64: &str,
        language_hint: Option<&str>,
        auto_detect: bool,
    ) -> Result<ExchangeOutcome> {
        self.process(
            session_id,
            InboundPayload::AudioBase64(audio_base64.to_string()),
            language_hint,
            auto_detect,
            true,
        )
        .await
    }

    async fn process(
        &self,
        session_id: &str,
        payload: InboundPayload,
        language_hint: Option<&str>,
        auto_detect: bool,
        want_audio: bool,
    ) -> Result<ExchangeOutcome> {
        let mut trace = RequestTrace::new(session_id);

        let input = match self
            .normalizer
            .normalize(session_id, payload, language_hint, auto_detect)
            .await
        {
            Ok(input) => input,
            Err(e) => {
                trace.advance(RequestState::TranscriptionFailed);
                tracing::error!(session_id, stage = e.stage(), error = %e, "request aborted");
                return Err(e);
            }
        };
        if input.was_audio {
            trace.advance(RequestState::Transcribed);
        }

        let needs_bridge = !language::is_english(&input.language);

        // Deterministic shortcut: one- and two-word inputs get a fixed
        // greeting without touching retrieval or the reasoning collaborator
        if is_greeting(&input.text) {
            tracing::debug!(session_id, "greeting shortcut");
            return self
                .deliver(
                    session_id,
                    responses::SHORT_GREETING.to_string(),
                    &input.language,
                    needs_bridge,
                    want_audio,
                    None,
                    input.detected_language,
                    trace,
                )
                .await;
        }

        let query = if needs_bridge {
            let translated = self
                .bridge
                .translate(&input.text, &input.language, language::REASONING_LANGUAGE)
                .await;
            trace.advance(RequestState::TranslatedIn);
            translated
        } else {
            input.text.clone()
        };

        let context = self.context.retrieve(session_id, &query).await;
        trace.advance(RequestState::ContextRetrieved);

        let history_text = self
            .store
            .history_as_text(session_id, self.generator.agent_name());

        let answer = self
            .generator
            .generate(&query, &history_text, &context, &input.language)
            .await;
        trace.advance(if answer.used_fallback {
            RequestState::AnswerFallback
        } else {
            RequestState::Answered
        });

        self.queries.record(&query, &answer.reply.loan_type);

        let markdown = render::chat_markdown(&answer.reply);

        self.deliver(
            session_id,
            markdown,
            &input.language,
            needs_bridge,
            want_audio,
            answer.confidence,
            input.detected_language,
            trace,
        )
        .await
    }

    /// Bridge out, record the bot turn, synthesize, and assemble the outcome
    #[allow(clippy::too_many_arguments)]
    async fn deliver(
        &self,
        session_id: &str,
        answer_text: String,
        user_language: &str,
        needs_bridge: bool,
        want_audio: bool,
        confidence: Option<u8>,
        detected_language: Option<String>,
        mut trace: RequestTrace,
    ) -> Result<ExchangeOutcome> {
        let final_text = if needs_bridge {
            let translated = self
                .bridge
                .translate(&answer_text, language::REASONING_LANGUAGE, user_language)
                .await;
            trace.advance(RequestState::TranslatedOut);
            translated
        } else {
            answer_text
        };

        self.store.push_message(
            session_id,
            ChatMessage::bot(final_text.clone(), Some(user_language.to_string())),
        );

        let audio_wav = if want_audio {
            self.synthesize_answer(session_id, &final_text, user_language)
                .await
        } else {
            None
        };
        trace.advance(RequestState::Rendered);
        trace.advance(RequestState::Delivered);

        Ok(ExchangeOutcome {
            text: final_text,
            language: user_language.to_string(),
            audio_wav,
            confidence,
            detected_language,
            timestamp: Utc::now(),
        })
    }

    /// Synthesize an answer in chunks and splice them into one WAV.
    /// Synthesis failure is non-fatal: the caller delivers text without
    /// audio.
    async fn synthesize_answer(
        &self,
        session_id: &str,
        text: &str,
        language: &str,
    ) -> Option<Vec<u8>> {
        let speaker = language::speaker_for(language);
        let chunks = render::speech_chunks(text, tts::MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return None;
        }

        let mut wavs = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            match self.synthesizer.synthesize(chunk, language, speaker).await {
                Ok(wav) => wavs.push(wav),
                Err(e) => {
                    tracing::warn!(
                        session_id,
                        stage = e.stage(),
                        error = %e,
                        "synthesis failed, delivering text only"
                    );
                    return None;
                }
            }
        }

        match concat_wav(&wavs) {
            Ok(joined) => Some(joined),
            Err(e) => {
                // Degraded: at least the first chunk is audible
                tracing::warn!(session_id, error = %e, "audio concatenation failed");
                wavs.into_iter().next()
            }
        }
    }

    /// Parse, analyze, and cache an uploaded document for a session.
    /// When a non-English target language is requested, the cleaned text is
    /// also bridged into that language.
    pub async fn ingest_document(
        &self,
        session_id: &str,
        file_name: &str,
        content: &[u8],
        target_language: Option<&str>,
    ) -> Result<DocumentContext> {
        let parser = self
            .document_parser
            .as_ref()
            .ok_or_else(|| Error::Document("no document parser configured".into()))?;

        let parsed = parser
            .parse(file_name, content, document::MAX_PAGES)
            .await?;
        let mut doc = DocumentAnalyzer::analyze(file_name, &parsed);

        if let Some(target) = target_language {
            if !language::is_english(target) {
                doc.translated_text = Some(
                    self.bridge
                        .translate(&doc.raw_text, language::REASONING_LANGUAGE, target)
                        .await,
                );
            }
        }

        self.store.set_document(session_id, doc.clone());
        Ok(doc)
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn queries(&self) -> &Arc<QueryLog> {
        &self.queries
    }
}

/// The observed shortcut: any input of one or two whitespace-separated
/// words is answered with the fixed greeting, deterministically.
fn is_greeting(text: &str) -> bool {
    let words = text.split_whitespace().count();
    (1..=responses::GREETING_SHORTCUT_MAX_WORDS).contains(&words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_shortcut_bounds() {
        assert!(is_greeting("Hi"));
        assert!(is_greeting("hello there"));
        assert!(is_greeting("  नमस्ते  "));
        assert!(!is_greeting(""));
        assert!(!is_greeting("what are home loan rates"));
    }
}
