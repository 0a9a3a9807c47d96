//! Text-to-speech

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;

use advisor_config::constants::tts::SAMPLE_RATE;
use advisor_core::{Error, Result, SpeechSynthesizer};

use crate::client::SarvamClient;

#[async_trait]
impl SpeechSynthesizer for SarvamClient {
    async fn synthesize(&self, text: &str, language: &str, speaker: &str) -> Result<Vec<u8>> {
        let body = json!({
            "inputs": [text],
            "target_language_code": language,
            "speaker": speaker,
            "enable_preprocessing": true,
            "speech_sample_rate": SAMPLE_RATE,
        });

        let reply = self
            .post_json("/text-to-speech", &body)
            .await
            .map_err(|e| Error::Synthesis(e.to_string()))?;

        let encoded = reply
            .get("audios")
            .and_then(|a| a.as_array())
            .and_then(|a| a.first())
            .and_then(|a| a.as_str())
            .ok_or_else(|| Error::Synthesis("response carried no audio".into()))?;

        let wav = BASE64
            .decode(encoded)
            .map_err(|e| Error::Synthesis(format!("audio payload is not base64: {e}")))?;

        tracing::debug!(bytes = wav.len(), language, speaker, "synthesized audio chunk");
        Ok(wav)
    }
}
