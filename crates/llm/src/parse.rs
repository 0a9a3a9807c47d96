//! Strict parse-or-default decoding of reasoning output
//!
//! The contract is deliberately narrow: the payload either decodes as a
//! whole (a Markdown code fence around it is tolerated, since models add
//! one even when told not to), or the caller gets the default reply. There
//! is no substring scanning for braces; partially valid output is treated
//! as invalid.

use advisor_config::constants::responses::FALLBACK_APOLOGY;
use advisor_core::AdvisorReply;

/// Strip a wrapping Markdown code fence, if present
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (``` or ```json) and a closing ``` line
    let rest = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => return trimmed,
    };
    match rest.rfind("```") {
        Some(idx) => rest[..idx].trim(),
        None => rest.trim(),
    }
}

/// Decode a structured reply, or `None` if the payload is not valid JSON
pub fn parse_reply(raw: &str) -> Option<AdvisorReply> {
    serde_json::from_str(strip_code_fence(raw)).ok()
}

/// Decode an arbitrary JSON object under the same strict contract.
/// Used for the per-tool output schemas.
pub fn parse_json_object(raw: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str(strip_code_fence(raw)).ok()? {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Decode a structured reply, substituting the default apology reply on
/// failure. The boolean reports whether decoding succeeded.
pub fn parse_reply_or_default(raw: &str) -> (AdvisorReply, bool) {
    match parse_reply(raw) {
        Some(reply) => (reply, true),
        None => {
            tracing::warn!(chars = raw.len(), "reasoning output was not valid JSON");
            (AdvisorReply::fallback(FALLBACK_APOLOGY), false)
        }
    }
}

/// Decode a numeric field that models emit as either a number or a string
pub fn parse_numeric_field(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f.round() as i64),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_json() {
        let raw = r#"{"result": "Rates start at 8.5%.", "loan_type": "Home Loan"}"#;
        let (reply, ok) = parse_reply_or_default(raw);
        assert!(ok);
        assert_eq!(reply.loan_type, "Home Loan");
    }

    #[test]
    fn test_parses_fenced_json() {
        let raw = "```json\n{\"result\": \"ok\"}\n```";
        let (reply, ok) = parse_reply_or_default(raw);
        assert!(ok);
        assert_eq!(reply.result, "ok");
    }

    #[test]
    fn test_invalid_payload_yields_default_apology() {
        let raw = "Sure! Here are some thoughts on loans: they are great.";
        let (reply, ok) = parse_reply_or_default(raw);
        assert!(!ok);
        assert_eq!(reply.result, FALLBACK_APOLOGY);
        assert!(reply.loan_type.is_empty());
        assert!(reply.interest_rate.is_empty());
        assert!(reply.eligibility.is_empty());
        assert!(reply.repayment_options.is_empty());
        assert!(reply.additional_info.is_empty());
        assert!(reply.tool_call.is_empty());
    }

    #[test]
    fn test_no_brace_scanning_recovery() {
        // Prose around an embedded object must NOT be rescued
        let raw = r#"Here you go: {"result": "hidden"} hope that helps"#;
        let (reply, ok) = parse_reply_or_default(raw);
        assert!(!ok);
        assert_eq!(reply.result, FALLBACK_APOLOGY);
    }

    #[test]
    fn test_numeric_field_accepts_number_and_string() {
        assert_eq!(parse_numeric_field(&serde_json::json!(87)), Some(87));
        assert_eq!(parse_numeric_field(&serde_json::json!("72")), Some(72));
        assert_eq!(parse_numeric_field(&serde_json::json!("85%")), Some(85));
        assert_eq!(parse_numeric_field(&serde_json::json!([1])), None);
    }
}
