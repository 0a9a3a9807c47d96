//! Shared HTTP client for the language services vendor

use advisor_config::ProviderEndpoint;

use crate::SpeechError;

/// Speech-to-text model requested from the service
pub(crate) const STT_MODEL: &str = "saarika:v2";

/// Parsing mode requested from the document parser
pub(crate) const PARSE_MODE: &str = "small";

/// Client for the vendor's speech/translation/parsing endpoints.
///
/// All capabilities share one base URL, subscription key, and timeout.
#[derive(Clone)]
pub struct SarvamClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl SarvamClient {
    /// Build a client from provider settings. The configured timeout applies
    /// to every request, so a stalled service degrades like a failed one.
    pub fn new(config: &ProviderEndpoint) -> Result<Self, SpeechError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SpeechError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode a JSON reply, mapping non-2xx to an error
    pub(crate) async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, SpeechError> {
        let response = self
            .http
            .post(self.url(path))
            .header("api-subscription-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))
    }

    /// POST a multipart form and decode a JSON reply
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<serde_json::Value, SpeechError> {
        let response = self
            .http
            .post(self.url(path))
            .header("api-subscription-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))
    }
}
