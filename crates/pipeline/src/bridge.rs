//! Language Bridge
//!
//! Converts text between the user's language and the reasoning language.
//! Long text is split at sentence boundaries to fit the translation
//! service's per-call budget; each chunk translates independently and a
//! failed chunk passes through untranslated, so output may be partially
//! untranslated but is always present.

use std::sync::Arc;

use advisor_config::constants::translate::{MAX_CHUNK_CHARS, SENTENCE_TERMINATORS};
use advisor_core::Translator;

/// Split text into chunks of at most `max_chars` characters without ending
/// any chunk mid-sentence.
///
/// A single sentence longer than the budget is kept whole rather than cut;
/// the service may reject it, and the bridge then degrades that chunk to
/// passthrough.
pub fn sentence_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.chars().count() <= max_chars {
        return vec![trimmed.to_string()];
    }

    // Cut into sentences at terminal punctuation, keeping the terminator
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in trimmed.chars() {
        current.push(ch);
        if SENTENCE_TERMINATORS.contains(&ch) && !current.trim().is_empty() {
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }

    // Pack whole sentences greedily up to the budget
    let mut chunks: Vec<String> = Vec::new();
    let mut chunk = String::new();
    for sentence in sentences {
        let sentence_len = sentence.chars().count();
        let chunk_len = chunk.chars().count();

        if !chunk.is_empty() && chunk_len + 1 + sentence_len > max_chars {
            chunks.push(std::mem::take(&mut chunk));
        }
        if !chunk.is_empty() {
            chunk.push(' ');
        }
        chunk.push_str(&sentence);
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }

    chunks
}

/// Stage 2: chunked translation with per-chunk degradation
pub struct LanguageBridge {
    translator: Arc<dyn Translator>,
}

impl LanguageBridge {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// Identity when the languages match (no network call). Never fails:
    /// chunks whose translation call errors are passed through in the
    /// source language, and callers must tolerate partially-untranslated
    /// output.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if source == target || text.trim().is_empty() {
            return text.to_string();
        }

        let chunks = sentence_chunks(text, MAX_CHUNK_CHARS);
        let mut translated = Vec::with_capacity(chunks.len());

        for chunk in &chunks {
            match self.translator.translate(chunk, source, target).await {
                Ok(output) => translated.push(output),
                Err(e) => {
                    tracing::warn!(
                        source,
                        target,
                        chunk_chars = chunk.chars().count(),
                        error = %e,
                        "chunk translation degraded to passthrough"
                    );
                    translated.push(chunk.clone());
                }
            }
        }

        translated.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Error, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTranslator {
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
    }

    impl CountingTranslator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: Some(call),
            }
        }
    }

    #[async_trait]
    impl Translator for CountingTranslator {
        async fn translate(&self, input: &str, _source: &str, _target: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_call == Some(call) {
                return Err(Error::Translation("injected failure".into()));
            }
            Ok(format!("[t]{input}"))
        }
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = sentence_chunks("One sentence. Another one.", 900);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_chunks_respect_budget_and_sentence_boundaries() {
        // 20 sentences of ~100 chars: budget of 350 fits 3 per chunk
        let sentence = format!("{} end.", "word ".repeat(19)); // ~100 chars
        let text = sentence.repeat(20);
        let chunks = sentence_chunks(&text, 350);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 350, "chunk over budget: {chunk}");
            assert!(
                chunk.ends_with('.'),
                "chunk ends mid-sentence: ...{}",
                &chunk[chunk.len().saturating_sub(20)..]
            );
        }
        // Nothing dropped
        let total_words: usize = chunks.iter().map(|c| c.split_whitespace().count()).sum();
        assert_eq!(total_words, text.split_whitespace().count());
    }

    #[test]
    fn test_devanagari_danda_is_a_boundary() {
        let text = "पहला वाक्य है। दूसरा वाक्य है। ".repeat(40);
        let chunks = sentence_chunks(&text, 100);
        for chunk in &chunks {
            assert!(chunk.ends_with('\u{0964}'));
        }
    }

    #[tokio::test]
    async fn test_identity_translation_makes_no_calls() {
        let translator = Arc::new(CountingTranslator::new());
        let bridge = LanguageBridge::new(translator.clone());

        let text = "Anything at all.";
        let out = bridge.translate(text, "hi-IN", "hi-IN").await;
        assert_eq!(out, text);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_call_count_matches_chunk_count() {
        let translator = Arc::new(CountingTranslator::new());
        let bridge = LanguageBridge::new(translator.clone());

        let sentence = format!("{} end.", "word ".repeat(30)); // ~155 chars
        let text = sentence.repeat(20); // ~3100 chars -> 4 chunks at 900
        let expected_chunks = sentence_chunks(&text, MAX_CHUNK_CHARS).len();

        let out = bridge.translate(&text, "en-IN", "hi-IN").await;
        assert_eq!(translator.calls.load(Ordering::SeqCst), expected_chunks);
        assert!(out.contains("[t]"));
    }

    #[tokio::test]
    async fn test_failed_chunk_passes_through() {
        let translator = Arc::new(CountingTranslator::failing_on(1));
        let bridge = LanguageBridge::new(translator.clone());

        let sentence = format!("{} end.", "word ".repeat(30));
        let text = sentence.repeat(20);
        let chunks = sentence_chunks(&text, MAX_CHUNK_CHARS);
        assert!(chunks.len() >= 3);

        let out = bridge.translate(&text, "en-IN", "hi-IN").await;
        // Translated chunks carry the marker; the failed one is verbatim
        assert!(out.contains("[t]"));
        assert!(out.contains(&chunks[1]));
    }
}
