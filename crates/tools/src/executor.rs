//! Tool execution
//!
//! Each tool is one further reasoning call with its own fixed output
//! schema. The formatted result is merged into the reply's
//! `additional_info`; it never replaces the primary answer.

use std::sync::Arc;

use serde_json::Value;

use advisor_core::{ChatTurn, ReasoningModel};
use advisor_llm::parse::parse_json_object;

use crate::kinds::{ToolCall, ToolKind};
use crate::ToolError;

/// Runs validated tool calls against the reasoning collaborator
pub struct ToolRunner {
    model: Arc<dyn ReasoningModel>,
}

impl ToolRunner {
    pub fn new(model: Arc<dyn ReasoningModel>) -> Self {
        Self { model }
    }

    fn prompt(call: &ToolCall) -> Vec<ChatTurn> {
        let shape: String = call
            .kind
            .output_keys()
            .iter()
            .map(|key| format!("\"{key}\""))
            .collect::<Vec<_>>()
            .join(", ");

        let task = match call.kind {
            ToolKind::EligibilityCheck => format!(
                "Determine the user's loan eligibility from their financial details.\n\
                 User details: {}",
                call.param("user_info")
            ),
            ToolKind::ApplicationGuidance => format!(
                "Guide the user through applying for this loan: required documents, \
                 application steps, and mistakes to avoid.\nLoan type: {}",
                call.param("loan_type")
            ),
            ToolKind::FinancialTips => format!(
                "Provide practical financial literacy tips for this interest.\n\
                 Topic: {}",
                call.param("topic")
            ),
            ToolKind::GoalTracking => format!(
                "Help the user track their financial goal and plan next steps.\n\
                 Goal: {}\nCurrent status: {}",
                call.param("goal"),
                call.param("status")
            ),
        };

        let system = format!(
            "You are a loan advisory assistant executing the \"{}\" capability. \
             Respond with a single JSON object and nothing else, using exactly \
             these keys (string values): {}.",
            call.kind.display_name(),
            shape
        );

        vec![ChatTurn::system(system), ChatTurn::user(task)]
    }

    /// Render the tool's output as a block for `additional_info`
    fn format_output(kind: ToolKind, output: &serde_json::Map<String, Value>) -> String {
        let mut block = format!("**{}**", kind.display_name());

        for key in kind.output_keys() {
            let Some(value) = output.get(*key) else {
                continue;
            };
            let rendered = match value {
                Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            if rendered.is_empty() {
                continue;
            }
            block.push_str(&format!("\n- {}: {}", label(key), rendered));
        }

        block
    }

    /// Execute one tool call and return the formatted block
    pub async fn run(&self, call: &ToolCall) -> Result<String, ToolError> {
        let turns = Self::prompt(call);

        let raw = self
            .model
            .complete(&turns)
            .await
            .map_err(|e| ToolError::Model(e.to_string()))?;

        let output = parse_json_object(&raw).ok_or(ToolError::UnparseableOutput)?;

        tracing::debug!(
            tool = call.kind.display_name(),
            keys = output.len(),
            "tool call completed"
        );

        Ok(Self::format_output(call.kind, &output))
    }
}

/// `income_requirement` -> `Income Requirement`
fn label(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Error, Result};
    use async_trait::async_trait;
    use serde_json::json;

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
            Err(Error::Generation("unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_run_formats_output_block() {
        let runner = ToolRunner::new(Arc::new(FixedModel(
            json!({
                "loan_type": "Home Loan",
                "income_requirement": "Rs. 30,000 per month",
                "credit_score": "700+",
                "employment_status": "salaried",
                "eligibility_result": "Eligible",
            })
            .to_string(),
        )));

        let call = ToolCall::resolve(
            "Loan Eligibility Check",
            &json!({ "user_info": "salaried, 50k/month" }),
        )
        .unwrap();

        let block = runner.run(&call).await.unwrap();
        assert!(block.starts_with("**Loan Eligibility Check**"));
        assert!(block.contains("- Income Requirement: Rs. 30,000 per month"));
        assert!(block.contains("- Eligibility Result: Eligible"));
    }

    #[tokio::test]
    async fn test_run_joins_array_values() {
        let runner = ToolRunner::new(Arc::new(FixedModel(
            json!({
                "required_documents": ["PAN card", "salary slips"],
                "application_steps": "apply online",
                "common_mistakes": [],
            })
            .to_string(),
        )));

        let call = ToolCall::resolve(
            "Loan Application Guidance",
            &json!({ "loan_type": "car loan" }),
        )
        .unwrap();

        let block = runner.run(&call).await.unwrap();
        assert!(block.contains("- Required Documents: PAN card; salary slips"));
        assert!(!block.contains("Common Mistakes"));
    }

    #[tokio::test]
    async fn test_unparseable_output_is_an_error() {
        let runner = ToolRunner::new(Arc::new(FixedModel("here are your tips!".into())));
        let call =
            ToolCall::resolve("Financial Literacy Tips", &json!({ "topic": "saving" })).unwrap();
        assert!(matches!(
            runner.run(&call).await,
            Err(ToolError::UnparseableOutput)
        ));
    }

    #[tokio::test]
    async fn test_model_failure_is_an_error() {
        let runner = ToolRunner::new(Arc::new(FailingModel));
        let call =
            ToolCall::resolve("Financial Literacy Tips", &json!({ "topic": "saving" })).unwrap();
        assert!(matches!(runner.run(&call).await, Err(ToolError::Model(_))));
    }
}
