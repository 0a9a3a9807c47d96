//! Response Generator
//!
//! One reasoning call per request, decoded under the strict
//! parse-or-default contract. A requested tool runs through the closed
//! dispatch in `advisor-tools` and its output lands in `additional_info`.
//! Confidence is a second, independent call and advisory only.

use std::sync::Arc;

use advisor_config::constants::responses::{FALLBACK_APOLOGY, TOOL_FAILURE_NOTE};
use advisor_core::{AdvisorReply, ReasoningModel};
use advisor_llm::{parse_reply_or_default, ConfidenceScorer, PromptBuilder};
use advisor_tools::{ToolCall, ToolRunner};

/// Result of the generation stage
#[derive(Debug)]
pub struct GeneratedAnswer {
    pub reply: AdvisorReply,
    /// Advisory 0-100 score from the second reasoning call, when enabled
    pub confidence: Option<u8>,
    /// True when the reply is the default apology (soft failure)
    pub used_fallback: bool,
}

/// Stage 4: prompt assembly, reasoning call, tool dispatch, scoring
pub struct ResponseGenerator {
    model: Arc<dyn ReasoningModel>,
    tools: ToolRunner,
    confidence: Option<ConfidenceScorer>,
    agent_name: String,
}

impl ResponseGenerator {
    pub fn new(model: Arc<dyn ReasoningModel>, agent_name: impl Into<String>) -> Self {
        Self {
            tools: ToolRunner::new(model.clone()),
            confidence: None,
            model,
            agent_name: agent_name.into(),
        }
    }

    /// Enable confidence scoring (used by the voice front end)
    pub fn with_confidence(mut self) -> Self {
        self.confidence = Some(ConfidenceScorer::new(self.model.clone()));
        self
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Generate a structured reply for a query already in the reasoning
    /// language. Never fails: reasoning errors and undecodable output both
    /// degrade to the default apology reply.
    pub async fn generate(
        &self,
        query: &str,
        history_text: &str,
        context: &str,
        user_language: &str,
    ) -> GeneratedAnswer {
        let turns = PromptBuilder::new(&self.agent_name)
            .with_history(history_text)
            .with_context(context)
            .with_language(user_language)
            .build(query);

        let (mut reply, parsed) = match self.model.complete(&turns).await {
            Ok(raw) => parse_reply_or_default(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "reasoning call failed, using fallback reply");
                (AdvisorReply::fallback(FALLBACK_APOLOGY), false)
            }
        };

        if reply.wants_tool() {
            self.dispatch_tool(&mut reply).await;
        }

        let confidence = match &self.confidence {
            Some(scorer) => Some(scorer.score(query, context, &reply.result).await),
            None => None,
        };

        GeneratedAnswer {
            used_fallback: !parsed,
            confidence,
            reply,
        }
    }

    /// Run the requested tool and merge its output into `additional_info`.
    /// Failures annotate the reply instead of failing the answer.
    async fn dispatch_tool(&self, reply: &mut AdvisorReply) {
        let block = match ToolCall::resolve(&reply.tool_call, &reply.tool_parameters) {
            Ok(call) => match self.tools.run(&call).await {
                Ok(block) => block,
                Err(e) => {
                    tracing::warn!(tool = %reply.tool_call, error = %e, "tool execution failed");
                    TOOL_FAILURE_NOTE.to_string()
                }
            },
            Err(e) => {
                tracing::warn!(tool = %reply.tool_call, error = %e, "tool call rejected");
                TOOL_FAILURE_NOTE.to_string()
            }
        };

        if reply.additional_info.trim().is_empty() {
            reply.additional_info = block;
        } else {
            reply.additional_info = format!("{}\n\n{}", reply.additional_info.trim(), block);
        }
    }
}
