//! Tool kinds, parameter schemas, and output shapes

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::ToolError;

/// The closed set of capabilities the generator may dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Assess loan eligibility from the user's financial details
    EligibilityCheck,
    /// Walk the user through applying for a loan
    ApplicationGuidance,
    /// Financial literacy tips for a topic
    FinancialTips,
    /// Track progress toward a financial goal
    GoalTracking,
}

static ELIGIBILITY_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    compile(json!({
        "type": "object",
        "properties": { "user_info": { "type": "string", "minLength": 1 } },
        "required": ["user_info"],
    }))
});

static APPLICATION_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    compile(json!({
        "type": "object",
        "properties": { "loan_type": { "type": "string", "minLength": 1 } },
        "required": ["loan_type"],
    }))
});

static TIPS_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    compile(json!({
        "type": "object",
        "properties": { "topic": { "type": "string", "minLength": 1 } },
        "required": ["topic"],
    }))
});

static GOAL_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    compile(json!({
        "type": "object",
        "properties": {
            "goal": { "type": "string", "minLength": 1 },
            "status": { "type": "string" },
        },
        "required": ["goal"],
    }))
});

fn compile(schema: Value) -> JSONSchema {
    // The schemas above are static literals; failing to compile one is a
    // programming error caught by the tests below. Leaked so the compiled
    // schema can back a process-lifetime static.
    let schema: &'static Value = Box::leak(Box::new(schema));
    JSONSchema::compile(schema).expect("tool parameter schema must compile")
}

impl ToolKind {
    /// Resolve the name the generator prompt advertises. Matching is
    /// case-insensitive to absorb model capitalization drift.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "loan eligibility check" => Some(Self::EligibilityCheck),
            "loan application guidance" => Some(Self::ApplicationGuidance),
            "financial literacy tips" => Some(Self::FinancialTips),
            "financial goal tracking" => Some(Self::GoalTracking),
            _ => None,
        }
    }

    /// Display name used in prompts and rendered output
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::EligibilityCheck => "Loan Eligibility Check",
            Self::ApplicationGuidance => "Loan Application Guidance",
            Self::FinancialTips => "Financial Literacy Tips",
            Self::GoalTracking => "Financial Goal Tracking",
        }
    }

    fn parameter_schema(&self) -> &'static JSONSchema {
        match self {
            Self::EligibilityCheck => &ELIGIBILITY_SCHEMA,
            Self::ApplicationGuidance => &APPLICATION_SCHEMA,
            Self::FinancialTips => &TIPS_SCHEMA,
            Self::GoalTracking => &GOAL_SCHEMA,
        }
    }

    /// Keys the tool's own reasoning call must answer with, in render order
    pub fn output_keys(&self) -> &'static [&'static str] {
        match self {
            Self::EligibilityCheck => &[
                "loan_type",
                "income_requirement",
                "credit_score",
                "employment_status",
                "eligibility_result",
            ],
            Self::ApplicationGuidance => {
                &["required_documents", "application_steps", "common_mistakes"]
            }
            Self::FinancialTips => &["saving_tips", "credit_score_tips", "investment_advice"],
            Self::GoalTracking => &[
                "goal",
                "current_status",
                "progress_percentage",
                "next_steps",
                "loan_advice",
                "next_due_date",
                "refinancing_guidance",
            ],
        }
    }
}

/// A validated request to run one tool
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub kind: ToolKind,
    pub parameters: Value,
}

impl ToolCall {
    /// Build a call from the generator's `tool_call` / `tool_parameters`
    /// fields, validating the parameters against the kind's schema.
    pub fn resolve(name: &str, parameters: &Value) -> Result<Self, ToolError> {
        let kind =
            ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        // Models occasionally emit the parameters object as a JSON string
        let parameters = match parameters {
            Value::String(s) => serde_json::from_str(s).unwrap_or(Value::Null),
            other => other.clone(),
        };

        let schema = kind.parameter_schema();
        if let Err(errors) = schema.validate(&parameters) {
            let message = errors
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ToolError::InvalidParameters {
                tool: kind.display_name(),
                message,
            });
        }

        Ok(Self { kind, parameters })
    }

    /// Fetch a validated string parameter (absent optionals become empty)
    pub fn param(&self, key: &str) -> &str {
        self.parameters
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive_and_closed() {
        assert_eq!(
            ToolKind::from_name("Loan Eligibility Check"),
            Some(ToolKind::EligibilityCheck)
        );
        assert_eq!(
            ToolKind::from_name("financial GOAL tracking"),
            Some(ToolKind::GoalTracking)
        );
        assert_eq!(ToolKind::from_name("Delete All Records"), None);
    }

    #[test]
    fn test_resolve_validates_parameters() {
        let ok = ToolCall::resolve(
            "Loan Application Guidance",
            &json!({ "loan_type": "home loan" }),
        );
        assert!(ok.is_ok());
        assert_eq!(ok.unwrap().param("loan_type"), "home loan");

        let missing = ToolCall::resolve("Loan Application Guidance", &json!({}));
        assert!(matches!(
            missing,
            Err(ToolError::InvalidParameters { .. })
        ));

        let wrong_type = ToolCall::resolve(
            "Loan Eligibility Check",
            &json!({ "user_info": 42 }),
        );
        assert!(wrong_type.is_err());
    }

    #[test]
    fn test_resolve_accepts_stringified_parameters() {
        let call = ToolCall::resolve(
            "Financial Literacy Tips",
            &json!("{\"topic\": \"savings\"}"),
        )
        .unwrap();
        assert_eq!(call.param("topic"), "savings");
    }

    #[test]
    fn test_optional_status_defaults_empty() {
        let call = ToolCall::resolve(
            "Financial Goal Tracking",
            &json!({ "goal": "buy a house" }),
        )
        .unwrap();
        assert_eq!(call.param("goal"), "buy a house");
        assert_eq!(call.param("status"), "");
    }

    #[test]
    fn test_all_schemas_compile() {
        for kind in [
            ToolKind::EligibilityCheck,
            ToolKind::ApplicationGuidance,
            ToolKind::FinancialTips,
            ToolKind::GoalTracking,
        ] {
            // Forces lazy compilation
            let _ = kind.parameter_schema();
            assert!(!kind.output_keys().is_empty());
        }
    }
}
