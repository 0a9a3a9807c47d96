//! Confidence scoring
//!
//! A second, independent reasoning call rates the generated answer against
//! the query and context on a 0-100 scale. The score is a soft heuristic
//! produced by an uncontrolled model, so it is advisory only; any parse
//! failure falls back to the neutral midpoint.

use std::sync::Arc;

use advisor_config::constants::confidence::NEUTRAL_SCORE;
use advisor_core::{ChatTurn, ReasoningModel};

use crate::parse::parse_numeric_field;

/// Scores answers with a dedicated reasoning call
pub struct ConfidenceScorer {
    model: Arc<dyn ReasoningModel>,
}

impl ConfidenceScorer {
    pub fn new(model: Arc<dyn ReasoningModel>) -> Self {
        Self { model }
    }

    fn prompt(query: &str, context: &str, response: &str) -> Vec<ChatTurn> {
        let system = "You are a confidence evaluator for a loan advisory assistant. \
                      Assess the generated response against the user's query and the \
                      provided context, considering relevance, consistency, specificity, \
                      completeness, and language. Respond with a single JSON object and \
                      nothing else: {\"confidence_score\": <number from 0 to 100>}";

        let user = format!(
            "User's query: {query}\n\nContext: {context}\n\nGenerated response: {response}"
        );

        vec![ChatTurn::system(system), ChatTurn::user(user)]
    }

    /// Rate a response from 0 to 100; neutral on any failure
    pub async fn score(&self, query: &str, context: &str, response: &str) -> u8 {
        let turns = Self::prompt(query, context, response);

        let raw = match self.model.complete(&turns).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "confidence call failed, using neutral score");
                return NEUTRAL_SCORE;
            }
        };

        Self::parse_score(&raw).unwrap_or_else(|| {
            tracing::warn!("confidence output unparseable, using neutral score");
            NEUTRAL_SCORE
        })
    }

    fn parse_score(raw: &str) -> Option<u8> {
        let map = crate::parse::parse_json_object(raw)?;
        let score = parse_numeric_field(map.get("confidence_score")?)?;
        Some(score.clamp(0, 100) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Error, Result};
    use async_trait::async_trait;

    struct FixedModel(String);

    #[async_trait]
    impl ReasoningModel for FixedModel {
        async fn complete(&self, _turns: &[ChatTurn]) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ReasoningModel for FailingModel {
        async fn complete(&self, _turns: &[ChatTurn]) -> Result<String> {
            Err(Error::Generation("boom".into()))
        }
    }

    #[tokio::test]
    async fn test_score_parses_number() {
        let scorer = ConfidenceScorer::new(Arc::new(FixedModel(
            r#"{"confidence_score": 87}"#.into(),
        )));
        assert_eq!(scorer.score("q", "c", "r").await, 87);
    }

    #[tokio::test]
    async fn test_score_parses_string_and_clamps() {
        let scorer = ConfidenceScorer::new(Arc::new(FixedModel(
            r#"{"confidence_score": "140"}"#.into(),
        )));
        assert_eq!(scorer.score("q", "c", "r").await, 100);
    }

    #[tokio::test]
    async fn test_unparseable_output_is_neutral() {
        let scorer = ConfidenceScorer::new(Arc::new(FixedModel("very confident!".into())));
        assert_eq!(scorer.score("q", "c", "r").await, NEUTRAL_SCORE);
    }

    #[tokio::test]
    async fn test_model_failure_is_neutral() {
        let scorer = ConfidenceScorer::new(Arc::new(FailingModel));
        assert_eq!(scorer.score("q", "c", "r").await, NEUTRAL_SCORE);
    }
}
