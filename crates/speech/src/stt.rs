//! Speech-to-text and language detection

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use advisor_core::{Error, Result, SpeechToText, Transcript};

use crate::client::{SarvamClient, STT_MODEL};
use crate::SpeechError;

impl SarvamClient {
    fn audio_form(audio_wav: &[u8]) -> Result<Form> {
        let part = Part::bytes(audio_wav.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| Error::Transcription(format!("invalid audio part: {e}")))?;

        Ok(Form::new()
            .text("model", STT_MODEL)
            .text("with_timesteps", "false")
            .part("file", part))
    }
}

#[async_trait]
impl SpeechToText for SarvamClient {
    async fn transcribe(
        &self,
        audio_wav: &[u8],
        language_hint: Option<&str>,
    ) -> Result<Transcript> {
        let mut form = Self::audio_form(audio_wav)?;
        if let Some(language) = language_hint {
            form = form.text("language_code", language.to_string());
        }

        let body = self
            .post_multipart("/speech-to-text", form)
            .await
            .map_err(|e| Error::Transcription(e.to_string()))?;

        let text = body
            .get("transcript")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        let language_code = body
            .get("language_code")
            .and_then(|l| l.as_str())
            .map(String::from);

        tracing::debug!(
            chars = text.len(),
            language = language_code.as_deref().unwrap_or("unknown"),
            "speech-to-text response"
        );

        Ok(Transcript {
            text,
            language_code,
        })
    }

    async fn detect_language(&self, audio_wav: &[u8]) -> Result<Option<String>> {
        let form = Self::audio_form(audio_wav)?.text("detect_language", "true");

        let body = self
            .post_multipart("/speech-to-text", form)
            .await
            .map_err(|e: SpeechError| Error::Transcription(e.to_string()))?;

        // The service has reported the detection under either key
        let detected = body
            .get("language_code")
            .or_else(|| body.get("detected_language"))
            .and_then(|l| l.as_str())
            .map(String::from);

        tracing::debug!(
            language = detected.as_deref().unwrap_or("none"),
            "language detection response"
        );

        Ok(detected)
    }
}
