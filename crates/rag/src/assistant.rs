//! Managed retrieval assistant client

use async_trait::async_trait;
use serde_json::json;

use advisor_config::ProviderEndpoint;
use advisor_core::{Citation, KnowledgeAssistant, Result, RetrievedContext};

use crate::RagError;

/// Chat-style client for the hosted RAG assistant.
///
/// The assistant answers a query from its indexed knowledge base and cites
/// the passages it grounded the answer on.
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    assistant_name: String,
}

impl AssistantClient {
    pub fn new(
        config: &ProviderEndpoint,
        assistant_name: impl Into<String>,
    ) -> std::result::Result<Self, RagError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RagError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            assistant_name: assistant_name.into(),
        })
    }

    async fn chat(&self, query: &str) -> std::result::Result<serde_json::Value, RagError> {
        let url = format!("{}/assistant/chat/{}", self.base_url, self.assistant_name);
        let body = json!({
            "messages": [{ "role": "user", "content": query }],
        });

        let response = self
            .http
            .post(url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| RagError::InvalidResponse(e.to_string()))
    }

    fn parse_citations(body: &serde_json::Value) -> Vec<Citation> {
        let mut citations = Vec::new();
        let Some(entries) = body.get("citations").and_then(|c| c.as_array()) else {
            return citations;
        };

        for entry in entries {
            let excerpt = entry
                .get("text")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string();

            let references = entry
                .get("references")
                .and_then(|r| r.as_array())
                .cloned()
                .unwrap_or_default();

            if references.is_empty() {
                if !excerpt.is_empty() {
                    citations.push(Citation {
                        excerpt,
                        ..Default::default()
                    });
                }
                continue;
            }

            for reference in references {
                let file = reference
                    .get("file")
                    .and_then(|f| f.get("name"))
                    .and_then(|n| n.as_str())
                    .unwrap_or("unknown")
                    .to_string();
                let pages = reference
                    .get("pages")
                    .and_then(|p| p.as_array())
                    .map(|pages| {
                        pages
                            .iter()
                            .filter_map(|p| p.as_u64())
                            .map(|p| p as u32)
                            .collect()
                    })
                    .unwrap_or_default();

                citations.push(Citation {
                    excerpt: excerpt.clone(),
                    file,
                    pages,
                });
            }
        }

        citations
    }
}

#[async_trait]
impl KnowledgeAssistant for AssistantClient {
    async fn ask(&self, query: &str) -> Result<RetrievedContext> {
        let body = self.chat(query).await?;

        let content = body
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        let citations = Self::parse_citations(&body);

        tracing::debug!(
            chars = content.len(),
            citations = citations.len(),
            "retrieval assistant answered"
        );

        Ok(RetrievedContext { content, citations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_citations_flattens_references() {
        let body = serde_json::json!({
            "message": { "content": "Home loans start at 8.5%." },
            "citations": [{
                "text": "rates from 8.5% to 9.2%",
                "references": [
                    { "file": { "name": "rates.pdf" }, "pages": [3, 4] },
                    { "file": { "name": "faq.pdf" }, "pages": [] }
                ]
            }]
        });

        let citations = AssistantClient::parse_citations(&body);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].file, "rates.pdf");
        assert_eq!(citations[0].pages, vec![3, 4]);
        assert_eq!(citations[1].file, "faq.pdf");
        assert_eq!(citations[0].excerpt, "rates from 8.5% to 9.2%");
    }

    #[test]
    fn test_parse_citations_handles_absent_block() {
        let body = serde_json::json!({ "message": { "content": "hi" } });
        assert!(AssistantClient::parse_citations(&body).is_empty());
    }
}
