//! Cached summary of an uploaded document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Derived view of an uploaded file, cached per session.
///
/// Replaced wholesale when the session uploads another document; there is no
/// versioning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentContext {
    pub file_name: String,
    /// Cleaned plain text of the parsed pages
    pub raw_text: String,
    /// Present only when a non-English target language was requested at upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    pub pages_processed: u32,
    pub total_pages: u32,
    /// Regex-derived key facts (loan_amount, interest_rate, loan_term)
    pub extracted_fields: BTreeMap<String, String>,
    /// Leading slice of the cleaned text
    pub summary_excerpt: String,
}

impl DocumentContext {
    /// Render the document as a context block for the reasoning prompt
    pub fn as_prompt_block(&self) -> String {
        let mut block = format!(
            "--- DOCUMENT ANALYSIS ---\nDocument: {}\nPages Processed: {} of {}\n\n{}",
            self.file_name, self.pages_processed, self.total_pages, self.summary_excerpt
        );
        if !self.extracted_fields.is_empty() {
            block.push_str("\n\nExtracted Information:");
            for (key, value) in &self.extracted_fields {
                block.push_str(&format!("\n- {key}: {value}"));
            }
        }
        block.push_str("\n--- END DOCUMENT ANALYSIS ---");
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_block_lists_fields() {
        let mut doc = DocumentContext {
            file_name: "sanction_letter.pdf".into(),
            pages_processed: 2,
            total_pages: 4,
            summary_excerpt: "Loan sanction letter".into(),
            ..Default::default()
        };
        doc.extracted_fields
            .insert("interest_rate".into(), "8.5%".into());

        let block = doc.as_prompt_block();
        assert!(block.contains("sanction_letter.pdf"));
        assert!(block.contains("2 of 4"));
        assert!(block.contains("interest_rate: 8.5%"));
    }
}
