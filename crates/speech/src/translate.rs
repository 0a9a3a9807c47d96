//! Translation

use async_trait::async_trait;
use serde_json::json;

use advisor_core::{Error, Result, Translator};

use crate::client::SarvamClient;

#[async_trait]
impl Translator for SarvamClient {
    async fn translate(&self, input: &str, source: &str, target: &str) -> Result<String> {
        let body = json!({
            "input": input,
            "source_language_code": source,
            "target_language_code": target,
            "mode": "formal",
            "enable_preprocessing": true,
        });

        let reply = self
            .post_json("/translate", &body)
            .await
            .map_err(|e| Error::Translation(e.to_string()))?;

        reply
            .get("translated_text")
            .and_then(|t| t.as_str())
            .map(String::from)
            .ok_or_else(|| Error::Translation("response carried no translated_text".into()))
    }
}
