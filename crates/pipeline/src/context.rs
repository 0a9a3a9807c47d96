//! Context Retriever
//!
//! Fetches supporting text for the query. The retrieval-service answer is
//! the primary source; a document cached on the session is appended as
//! supplementary context. This stage never raises: any collaborator
//! failure degrades to an empty string.

use std::sync::Arc;

use advisor_core::KnowledgeAssistant;
use advisor_store::SessionStore;

/// Stage 3: retrieval with degrade-to-empty semantics
pub struct ContextStage {
    assistant: Option<Arc<dyn KnowledgeAssistant>>,
    store: Arc<SessionStore>,
}

impl ContextStage {
    pub fn new(assistant: Option<Arc<dyn KnowledgeAssistant>>, store: Arc<SessionStore>) -> Self {
        Self { assistant, store }
    }

    /// Retrieve context for a query. Returns `""` when nothing is available
    /// or every source failed.
    pub async fn retrieve(&self, session_id: &str, query: &str) -> String {
        let mut sections: Vec<String> = Vec::new();

        if let Some(assistant) = &self.assistant {
            match assistant.ask(query).await {
                Ok(retrieved) => {
                    if !retrieved.content.trim().is_empty() {
                        sections.push(retrieved.content.trim().to_string());
                    }
                    for citation in retrieved.citations.iter().take(3) {
                        if !citation.excerpt.trim().is_empty() {
                            sections.push(format!(
                                "Source ({}): {}",
                                citation.file,
                                citation.excerpt.trim()
                            ));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        session_id,
                        error = %e,
                        "retrieval unavailable, continuing with empty context"
                    );
                }
            }
        }

        // Cached document content supplements, never replaces, the primary source
        if let Some(document) = self.store.document(session_id) {
            sections.push(document.as_prompt_block());
        }

        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Citation, DocumentContext, Error, Result, RetrievedContext};
    use async_trait::async_trait;

    struct FixedAssistant(String);

    #[async_trait]
    impl KnowledgeAssistant for FixedAssistant {
        async fn ask(&self, _query: &str) -> Result<RetrievedContext> {
            Ok(RetrievedContext {
                content: self.0.clone(),
                citations: vec![Citation {
                    excerpt: "rates table".into(),
                    file: "rates.pdf".into(),
                    pages: vec![1],
                }],
            })
        }
    }

    struct FailingAssistant;

    #[async_trait]
    impl KnowledgeAssistant for FailingAssistant {
        async fn ask(&self, _query: &str) -> Result<RetrievedContext> {
            Err(Error::Retrieval("service down".into()))
        }
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_string() {
        let store = Arc::new(SessionStore::new());
        let stage = ContextStage::new(Some(Arc::new(FailingAssistant)), store);
        assert_eq!(stage.retrieve("s1", "rates?").await, "");
    }

    #[tokio::test]
    async fn test_no_assistant_no_document_is_empty() {
        let store = Arc::new(SessionStore::new());
        let stage = ContextStage::new(None, store);
        assert_eq!(stage.retrieve("s1", "rates?").await, "");
    }

    #[tokio::test]
    async fn test_document_supplements_primary_source() {
        let store = Arc::new(SessionStore::new());
        store.set_document(
            "s1",
            DocumentContext {
                file_name: "offer.pdf".into(),
                summary_excerpt: "offer letter".into(),
                ..Default::default()
            },
        );

        let stage = ContextStage::new(
            Some(Arc::new(FixedAssistant("Home loans start at 8.5%.".into()))),
            store,
        );
        let context = stage.retrieve("s1", "rates?").await;

        // Assistant output comes first, document block after
        let primary = context.find("Home loans start at 8.5%.").unwrap();
        let doc = context.find("offer.pdf").unwrap();
        assert!(primary < doc);
        assert!(context.contains("Source (rates.pdf)"));
    }

    #[tokio::test]
    async fn test_document_alone_when_assistant_fails() {
        let store = Arc::new(SessionStore::new());
        store.set_document(
            "s1",
            DocumentContext {
                file_name: "offer.pdf".into(),
                ..Default::default()
            },
        );
        let stage = ContextStage::new(Some(Arc::new(FailingAssistant)), store);
        let context = stage.retrieve("s1", "rates?").await;
        assert!(context.contains("offer.pdf"));
    }
}
