//! Structured reply produced by the response generator
//!
//! The reasoning collaborator is instructed to answer with exactly these
//! fields. Parsing is strict: either the whole payload decodes into
//! `AdvisorReply`, or the caller substitutes `AdvisorReply::fallback()`.

use serde::{Deserialize, Serialize};

/// The fixed field set of a generated answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorReply {
    /// Primary response to the user's query
    #[serde(default)]
    pub result: String,
    /// Type of loan discussed, if any
    #[serde(default)]
    pub loan_type: String,
    /// Applicable interest rate, if stated
    #[serde(default)]
    pub interest_rate: String,
    /// Eligibility criteria, if stated
    #[serde(default)]
    pub eligibility: String,
    /// Repayment options, if stated
    #[serde(default)]
    pub repayment_options: String,
    /// Supplementary details; tool output is merged here
    #[serde(default)]
    pub additional_info: String,
    /// Name of a tool the model wants executed, empty for none
    #[serde(default)]
    pub tool_call: String,
    /// Keyword parameters for the requested tool
    #[serde(default)]
    pub tool_parameters: serde_json::Value,
}

impl AdvisorReply {
    /// Default reply substituted when the collaborator output cannot be
    /// decoded: the apology in `result`, everything else empty.
    pub fn fallback(apology: &str) -> Self {
        Self {
            result: apology.to_string(),
            ..Default::default()
        }
    }

    /// Whether the model asked for a tool to be executed
    pub fn wants_tool(&self) -> bool {
        let name = self.tool_call.trim();
        !name.is_empty() && !name.eq_ignore_ascii_case("none") && !name.eq_ignore_ascii_case("null")
    }

    /// Non-empty labeled fields in their fixed render order
    pub fn labeled_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Loan Type", self.loan_type.as_str()),
            ("Interest Rate", self.interest_rate.as_str()),
            ("Eligibility", self.eligibility.as_str()),
            ("Repayment Options", self.repayment_options.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_only_result() {
        let r = AdvisorReply::fallback("sorry");
        assert_eq!(r.result, "sorry");
        assert!(r.loan_type.is_empty());
        assert!(r.additional_info.is_empty());
        assert!(!r.wants_tool());
    }

    #[test]
    fn test_wants_tool_ignores_none_markers() {
        let mut r = AdvisorReply::default();
        assert!(!r.wants_tool());
        r.tool_call = "None".into();
        assert!(!r.wants_tool());
        r.tool_call = "Loan Eligibility Check".into();
        assert!(r.wants_tool());
    }

    #[test]
    fn test_decodes_with_missing_fields() {
        let r: AdvisorReply =
            serde_json::from_str(r#"{"result": "Home loans start at 8.5%."}"#).unwrap();
        assert_eq!(r.result, "Home loans start at 8.5%.");
        assert!(r.interest_rate.is_empty());
        assert!(r.tool_parameters.is_null());
    }
}
