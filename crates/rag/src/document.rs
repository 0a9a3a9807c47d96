//! Uploaded-document analysis
//!
//! Turns the parser's raw markup into the `DocumentContext` cached on the
//! session: strips tags, decodes entities, extracts the key loan facts by
//! regex, and keeps a leading excerpt as the summary.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use advisor_config::constants::document::SUMMARY_EXCERPT_CHARS;
use advisor_config::patterns;
use advisor_core::{DocumentContext, ParsedDocument};

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(patterns::MARKUP_TAG).unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(patterns::WHITESPACE_RUN).unwrap());
static LOAN_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(patterns::LOAN_AMOUNT).unwrap());
static INTEREST_RATE: Lazy<Regex> = Lazy::new(|| Regex::new(patterns::INTEREST_RATE).unwrap());
static LOAN_TERM: Lazy<Regex> = Lazy::new(|| Regex::new(patterns::LOAN_TERM).unwrap());

/// HTML entities that survive the parser's markup
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Stateless analyzer for parsed documents
pub struct DocumentAnalyzer;

impl DocumentAnalyzer {
    /// Strip markup tags and collapse whitespace into plain text
    pub fn clean_markup(content: &str) -> String {
        let without_tags = MARKUP_TAG.replace_all(content, " ");
        let mut text = WHITESPACE_RUN
            .replace_all(&without_tags, " ")
            .trim()
            .to_string();

        for (entity, replacement) in ENTITIES {
            text = text.replace(entity, replacement);
        }
        text
    }

    /// Extract the key loan facts present in the text
    pub fn extract_fields(text: &str) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();

        if let Some(caps) = LOAN_AMOUNT.captures(text) {
            fields.insert("loan_amount".to_string(), caps[1].replace(',', ""));
        }
        if let Some(caps) = INTEREST_RATE.captures(text) {
            fields.insert("interest_rate".to_string(), format!("{}%", &caps[1]));
        }
        if let Some(caps) = LOAN_TERM.captures(text) {
            fields.insert("loan_term".to_string(), caps[1].to_string());
        }

        fields
    }

    /// Leading excerpt used as the cached summary
    pub fn summary_excerpt(text: &str) -> String {
        let mut excerpt: String = text.chars().take(SUMMARY_EXCERPT_CHARS).collect();
        if text.chars().count() > SUMMARY_EXCERPT_CHARS {
            excerpt.push_str("...");
        }
        excerpt
    }

    /// Build the session-cached view of a parsed document
    pub fn analyze(file_name: &str, parsed: &ParsedDocument) -> DocumentContext {
        let raw_text = Self::clean_markup(&parsed.raw_markup);
        let extracted_fields = Self::extract_fields(&raw_text);
        let summary_excerpt = Self::summary_excerpt(&raw_text);

        tracing::info!(
            file_name,
            pages = parsed.pages_parsed,
            fields = extracted_fields.len(),
            "analyzed uploaded document"
        );

        DocumentContext {
            file_name: file_name.to_string(),
            raw_text,
            translated_text: None,
            pages_processed: parsed.pages_parsed,
            total_pages: parsed.total_pages,
            extracted_fields,
            summary_excerpt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_markup_strips_tags_and_entities() {
        let raw = "<page><p>Loan &amp; interest</p>\n\n<b>details</b></page>";
        assert_eq!(
            DocumentAnalyzer::clean_markup(raw),
            "Loan & interest details"
        );
    }

    #[test]
    fn test_extracts_interest_rate_with_percent() {
        let text = "This agreement carries an interest rate of 8.5% per annum.";
        let fields = DocumentAnalyzer::extract_fields(text);
        assert_eq!(fields.get("interest_rate").map(String::as_str), Some("8.5%"));
    }

    #[test]
    fn test_extracts_amount_without_commas_and_term() {
        let text = "Sanctioned loan amount: 12,50,000 for a term of 15 years.";
        let fields = DocumentAnalyzer::extract_fields(text);
        assert_eq!(fields.get("loan_amount").map(String::as_str), Some("1250000"));
        assert_eq!(fields.get("loan_term").map(String::as_str), Some("15"));
    }

    #[test]
    fn test_summary_excerpt_truncates_long_text() {
        let text = "x".repeat(SUMMARY_EXCERPT_CHARS + 100);
        let excerpt = DocumentAnalyzer::summary_excerpt(&text);
        assert_eq!(excerpt.chars().count(), SUMMARY_EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));

        let short = "short document";
        assert_eq!(DocumentAnalyzer::summary_excerpt(short), short);
    }

    #[test]
    fn test_analyze_builds_context() {
        let parsed = ParsedDocument {
            raw_markup: "<doc>Personal loan with interest rate of 8.5% only</doc>".into(),
            pages_parsed: 1,
            total_pages: 1,
        };
        let doc = DocumentAnalyzer::analyze("offer.pdf", &parsed);
        assert_eq!(doc.file_name, "offer.pdf");
        assert_eq!(
            doc.extracted_fields.get("interest_rate").map(String::as_str),
            Some("8.5%")
        );
        assert!(doc.summary_excerpt.starts_with("Personal loan"));
    }
}
