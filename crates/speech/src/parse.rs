//! Document parsing
//!
//! The parse endpoint works page by page. Pages are requested in order up
//! to the caller's limit; the first out-of-range page ends the loop, which
//! is how the total page count is discovered without inspecting the PDF
//! locally.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::multipart::{Form, Part};

use advisor_core::{DocumentParser, Error, ParsedDocument, Result};

use crate::client::{SarvamClient, PARSE_MODE};
use crate::SpeechError;

impl SarvamClient {
    async fn parse_page(
        &self,
        file_name: &str,
        content: &[u8],
        page_number: u32,
    ) -> std::result::Result<Option<String>, SpeechError> {
        let part = Part::bytes(content.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| SpeechError::InvalidRequest(e.to_string()))?;

        let form = Form::new()
            .text("page_number", page_number.to_string())
            .text("sarvam_mode", PARSE_MODE)
            .text("prompt_caching", "true")
            .part("pdf", part);

        let body = match self.post_multipart("/parse/parsepdf", form).await {
            Ok(body) => body,
            // Out-of-range pages come back as client errors; treat as end of document
            Err(SpeechError::Status(code)) if (400..500).contains(&code) => return Ok(None),
            Err(e) => return Err(e),
        };

        let encoded = match body.get("output").and_then(|o| o.as_str()) {
            Some(encoded) if !encoded.is_empty() => encoded,
            _ => return Ok(None),
        };

        let decoded = BASE64
            .decode(encoded)
            .map_err(|e| SpeechError::InvalidResponse(format!("output is not base64: {e}")))?;
        String::from_utf8(decoded)
            .map(Some)
            .map_err(|e| SpeechError::InvalidResponse(format!("output is not UTF-8: {e}")))
    }
}

#[async_trait]
impl DocumentParser for SarvamClient {
    async fn parse(
        &self,
        file_name: &str,
        content: &[u8],
        max_pages: u32,
    ) -> Result<ParsedDocument> {
        let mut pages = Vec::new();
        let mut reached_end = false;

        for page_number in 1..=max_pages {
            match self.parse_page(file_name, content, page_number).await {
                Ok(Some(markup)) => {
                    pages.push(format!("--- PAGE {page_number} ---\n{markup}"));
                }
                Ok(None) => {
                    reached_end = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(file_name, page_number, error = %e, "page parse failed");
                    // A transient failure on a later page should not discard
                    // what already parsed
                    if pages.is_empty() {
                        return Err(Error::Document(e.to_string()));
                    }
                    break;
                }
            }
        }

        if pages.is_empty() {
            return Err(Error::Document(format!(
                "no pages could be parsed from {file_name}"
            )));
        }

        let pages_parsed = pages.len() as u32;
        // When the loop stopped at the document's end the count is exact;
        // otherwise the document extends past the parse limit.
        let total_pages = if reached_end { pages_parsed } else { max_pages };

        tracing::info!(file_name, pages_parsed, total_pages, "document parsed");

        Ok(ParsedDocument {
            raw_markup: pages.join("\n\n"),
            pages_parsed,
            total_pages,
        })
    }
}
