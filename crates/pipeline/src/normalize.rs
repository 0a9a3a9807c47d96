//! Input Normalizer
//!
//! Turns an inbound payload (raw text or base64 audio) into plain UTF-8
//! text with a resolved language code, and appends the user turn to the
//! session history. This is the only stage allowed to fail the request: a
//! payload that yields no transcript cannot proceed.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use advisor_core::{language, ChatMessage, Error, Result, SpeechToText};
use advisor_store::SessionStore;

/// What arrived on the wire
#[derive(Debug, Clone)]
pub enum InboundPayload {
    Text(String),
    /// Base64-encoded WAV audio
    AudioBase64(String),
}

/// Normalized request input
#[derive(Debug, Clone)]
pub struct NormalizedInput {
    pub text: String,
    /// Resolved language for the whole request
    pub language: String,
    /// Set when auto-detection ran and identified a language
    pub detected_language: Option<String>,
    pub was_audio: bool,
}

/// Stage 1: payload normalization and language resolution
pub struct InputNormalizer {
    stt: Arc<dyn SpeechToText>,
    store: Arc<SessionStore>,
}

impl InputNormalizer {
    pub fn new(stt: Arc<dyn SpeechToText>, store: Arc<SessionStore>) -> Self {
        Self { stt, store }
    }

    pub async fn normalize(
        &self,
        session_id: &str,
        payload: InboundPayload,
        language_hint: Option<&str>,
        auto_detect: bool,
    ) -> Result<NormalizedInput> {
        match payload {
            InboundPayload::Text(text) => self.normalize_text(session_id, text, language_hint),
            InboundPayload::AudioBase64(encoded) => {
                self.normalize_audio(session_id, &encoded, language_hint, auto_detect)
                    .await
            }
        }
    }

    fn normalize_text(
        &self,
        session_id: &str,
        text: String,
        language_hint: Option<&str>,
    ) -> Result<NormalizedInput> {
        // A declared tag updates the sticky preference; otherwise the
        // preference holds, and English is the last resort.
        let language = self
            .store
            .resolve_language(session_id, language_hint)
            .unwrap_or_else(|| language::DEFAULT_LANGUAGE.to_string());

        self.store.push_message(
            session_id,
            ChatMessage::user(text.clone(), Some(language.clone())),
        );

        Ok(NormalizedInput {
            text,
            language,
            detected_language: None,
            was_audio: false,
        })
    }

    async fn normalize_audio(
        &self,
        session_id: &str,
        encoded: &str,
        language_hint: Option<&str>,
        auto_detect: bool,
    ) -> Result<NormalizedInput> {
        let audio = BASE64
            .decode(encoded)
            .map_err(|e| Error::Transcription(format!("audio payload is not base64: {e}")))?;

        let mut language = self
            .store
            .resolve_language(session_id, language_hint)
            .unwrap_or_else(|| language::DEFAULT_LANGUAGE.to_string());

        let mut detected_language = None;
        if auto_detect {
            // Detection failure is not fatal; the hint (or fallback) stands
            match self.stt.detect_language(&audio).await {
                Ok(Some(detected)) => {
                    tracing::info!(session_id, language = %detected, "auto-detected language");
                    self.store.resolve_language(session_id, Some(&detected));
                    detected_language = Some(detected.clone());
                    language = detected;
                }
                Ok(None) => {
                    tracing::debug!(session_id, "language detection returned nothing");
                }
                Err(e) => {
                    tracing::warn!(session_id, error = %e, "language detection failed");
                }
            }
        }

        let transcript = self.stt.transcribe(&audio, Some(&language)).await?;
        if transcript.text.trim().is_empty() {
            return Err(Error::Transcription(
                "failed to convert audio to text".into(),
            ));
        }

        tracing::info!(
            session_id,
            language = %language,
            chars = transcript.text.len(),
            "transcribed audio message"
        );

        self.store.push_message(
            session_id,
            ChatMessage::user(transcript.text.clone(), Some(language.clone())),
        );

        Ok(NormalizedInput {
            text: transcript.text,
            language,
            detected_language,
            was_audio: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::Transcript;
    use async_trait::async_trait;

    struct MockStt {
        transcript: String,
        detected: Option<String>,
    }

    #[async_trait]
    impl SpeechToText for MockStt {
        async fn transcribe(
            &self,
            _audio_wav: &[u8],
            language_hint: Option<&str>,
        ) -> advisor_core::Result<Transcript> {
            Ok(Transcript {
                text: self.transcript.clone(),
                language_code: language_hint.map(String::from),
            })
        }

        async fn detect_language(&self, _audio_wav: &[u8]) -> advisor_core::Result<Option<String>> {
            Ok(self.detected.clone())
        }
    }

    fn encoded_audio() -> String {
        BASE64.encode(b"fake-wav-bytes")
    }

    #[tokio::test]
    async fn test_text_defaults_to_english_without_hint() {
        let store = Arc::new(SessionStore::new());
        let normalizer = InputNormalizer::new(
            Arc::new(MockStt {
                transcript: String::new(),
                detected: None,
            }),
            store.clone(),
        );

        let input = normalizer
            .normalize("s1", InboundPayload::Text("Hi".into()), None, false)
            .await
            .unwrap();
        assert_eq!(input.language, language::DEFAULT_LANGUAGE);
        assert_eq!(store.history("s1").len(), 1);
        assert!(store.history("s1")[0].is_user);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_fatal() {
        let store = Arc::new(SessionStore::new());
        let normalizer = InputNormalizer::new(
            Arc::new(MockStt {
                transcript: "   ".into(),
                detected: None,
            }),
            store.clone(),
        );

        let err = normalizer
            .normalize(
                "s1",
                InboundPayload::AudioBase64(encoded_audio()),
                Some("hi-IN"),
                false,
            )
            .await
            .unwrap_err();
        assert!(err.is_fatal());
        // Nothing was appended to history
        assert!(store.history("s1").is_empty());
    }

    #[tokio::test]
    async fn test_auto_detect_overrides_hint() {
        let store = Arc::new(SessionStore::new());
        let normalizer = InputNormalizer::new(
            Arc::new(MockStt {
                transcript: "namaste".into(),
                detected: Some("hi-IN".into()),
            }),
            store.clone(),
        );

        let input = normalizer
            .normalize(
                "s1",
                InboundPayload::AudioBase64(encoded_audio()),
                Some("en-IN"),
                true,
            )
            .await
            .unwrap();
        assert_eq!(input.language, "hi-IN");
        assert_eq!(input.detected_language.as_deref(), Some("hi-IN"));
        assert!(input.was_audio);
    }

    #[tokio::test]
    async fn test_invalid_base64_is_fatal() {
        let store = Arc::new(SessionStore::new());
        let normalizer = InputNormalizer::new(
            Arc::new(MockStt {
                transcript: "x".into(),
                detected: None,
            }),
            store,
        );

        let err = normalizer
            .normalize(
                "s1",
                InboundPayload::AudioBase64("!!not-base64!!".into()),
                None,
                false,
            )
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
