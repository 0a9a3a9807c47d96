//! Output Renderer
//!
//! Formats a structured reply for each delivery channel: Markdown for the
//! chat widget, re-flowed plain text in `(i/N)` segments for the messaging
//! channel, and fixed-size chunks for speech synthesis.

use unicode_segmentation::UnicodeSegmentation;

use advisor_config::constants::messaging::{BULLET, MAX_SEGMENT_CHARS};
use advisor_config::constants::responses::GENERIC_FAILURE;
use advisor_core::AdvisorReply;

/// Room reserved per segment for the `(i/N) ` marker
const SEGMENT_PREFIX_RESERVE: usize = 16;

/// Chat rendering: non-empty fields concatenated as Markdown in fixed
/// order, falling back to the raw result (or a generic failure string)
/// when everything is empty.
pub fn chat_markdown(reply: &AdvisorReply) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !reply.result.trim().is_empty() {
        sections.push(reply.result.trim().to_string());
    }
    for (label, value) in reply.labeled_fields() {
        sections.push(format!("**{label}:** {value}"));
    }
    if !reply.additional_info.trim().is_empty() {
        sections.push(format!(
            "**Additional Information:**\n{}",
            reply.additional_info.trim()
        ));
    }

    if sections.is_empty() {
        return GENERIC_FAILURE.to_string();
    }
    sections.join("\n\n")
}

/// Re-flow Markdown into a plain-text approximation for the messaging
/// channel: headings become bolded single-line labels, `*`/`-` bullets
/// become a uniform glyph, and double-asterisk bold becomes single-asterisk
/// bold.
pub fn messaging_text(markdown: &str) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(markdown.lines().count());

    for line in markdown.lines() {
        let trimmed = line.trim_start();

        let converted = if let Some(heading) = strip_heading(trimmed) {
            format!("*{}*", heading.replace("**", "").trim())
        } else if let Some(item) = trimmed
            .strip_prefix("* ")
            .or_else(|| trimmed.strip_prefix("- "))
        {
            format!("{BULLET} {item}")
        } else {
            trimmed.to_string()
        };

        lines.push(converted.replace("**", "*"));
    }

    lines.join("\n")
}

fn strip_heading(line: &str) -> Option<&str> {
    for marker in ["### ", "## ", "# "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest);
        }
    }
    None
}

/// Split re-flowed text into delivery segments of at most
/// `MAX_SEGMENT_CHARS` characters, breaking on paragraph boundaries first
/// and on word boundaries inside an over-long paragraph. With more than
/// one segment, each is prefixed with an `(i/N) ` marker.
pub fn messaging_segments(markdown: &str) -> Vec<String> {
    let text = messaging_text(markdown);
    let budget = MAX_SEGMENT_CHARS - SEGMENT_PREFIX_RESERVE;

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        let pieces = if paragraph.chars().count() > budget {
            split_on_words(paragraph, budget)
        } else {
            vec![paragraph.to_string()]
        };

        for piece in pieces {
            let current_len = current.chars().count();
            let piece_len = piece.chars().count();

            if !current.is_empty() && current_len + 2 + piece_len > budget {
                segments.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    if segments.is_empty() {
        return vec![text];
    }

    let total = segments.len();
    if total > 1 {
        segments = segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| format!("({}/{}) {}", i + 1, total, segment))
            .collect();
    }
    segments
}

/// Greedy word-boundary split for a single over-long paragraph. A word
/// longer than the budget (URLs, mostly) is hard-cut.
fn split_on_words(paragraph: &str, budget: usize) -> Vec<String> {
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len > budget {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            let graphemes: Vec<&str> = word.graphemes(true).collect();
            for cut in graphemes.chunks(budget) {
                pieces.push(cut.concat());
            }
            continue;
        }

        if !current.is_empty() && current_len + 1 + word_len > budget {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Split answer text into synthesis-sized chunks. Grapheme-aware so a
/// chunk never cuts a combining sequence in half.
pub fn speech_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    graphemes
        .chunks(max_chars)
        .map(|chunk| chunk.concat())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_with(result: &str) -> AdvisorReply {
        AdvisorReply {
            result: result.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_chat_markdown_field_order() {
        let reply = AdvisorReply {
            result: "Here is an overview.".into(),
            loan_type: "Home Loan".into(),
            interest_rate: "8.5%".into(),
            additional_info: "Rates vary by bank.".into(),
            ..Default::default()
        };

        let md = chat_markdown(&reply);
        let result_pos = md.find("Here is an overview.").unwrap();
        let type_pos = md.find("**Loan Type:** Home Loan").unwrap();
        let rate_pos = md.find("**Interest Rate:** 8.5%").unwrap();
        let info_pos = md.find("**Additional Information:**").unwrap();
        assert!(result_pos < type_pos && type_pos < rate_pos && rate_pos < info_pos);
    }

    #[test]
    fn test_chat_markdown_empty_reply_is_generic_failure() {
        assert_eq!(chat_markdown(&reply_with("  ")), GENERIC_FAILURE);
    }

    #[test]
    fn test_messaging_text_reflow() {
        let md = "## Loan Options\nSome **important** text\n* first\n- second";
        let text = messaging_text(md);
        assert_eq!(
            text,
            format!("*Loan Options*\nSome *important* text\n{BULLET} first\n{BULLET} second")
        );
    }

    #[test]
    fn test_messaging_segments_long_answer() {
        // 5000 chars across 3 paragraphs
        let paragraph = "word ".repeat(333).trim_end().to_string(); // ~1664 chars
        let markdown = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}");

        let segments = messaging_segments(&markdown);
        assert!(segments.len() > 1);
        let total = segments.len();
        for (i, segment) in segments.iter().enumerate() {
            assert!(
                segment.chars().count() <= MAX_SEGMENT_CHARS,
                "segment {i} over limit: {} chars",
                segment.chars().count()
            );
            assert!(
                segment.starts_with(&format!("({}/{total}) ", i + 1)),
                "segment {i} missing marker: {}",
                &segment[..20.min(segment.len())]
            );
        }
    }

    #[test]
    fn test_messaging_single_segment_has_no_marker() {
        let segments = messaging_segments("A short answer.");
        assert_eq!(segments, vec!["A short answer.".to_string()]);
    }

    #[test]
    fn test_split_on_words_never_splits_a_word() {
        let paragraph = "alpha beta gamma delta epsilon ".repeat(100);
        let pieces = split_on_words(paragraph.trim(), 50);
        for piece in &pieces {
            assert!(piece.chars().count() <= 50);
            for word in piece.split_whitespace() {
                assert!(["alpha", "beta", "gamma", "delta", "epsilon"].contains(&word));
            }
        }
    }

    #[test]
    fn test_speech_chunks_sizes() {
        let text = "a".repeat(1000);
        let chunks = speech_chunks(&text, 450);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 450);
        assert_eq!(chunks[2].chars().count(), 100);

        assert!(speech_chunks("", 450).is_empty());
    }

    #[test]
    fn test_speech_chunks_keep_graphemes_whole() {
        // Devanagari combining sequences must not be cut
        let text = "नमस्ते ".repeat(200);
        for chunk in speech_chunks(&text, 450) {
            // Round-trips through grapheme segmentation without change
            let rejoined: String = chunk.graphemes(true).collect();
            assert_eq!(rejoined, chunk);
        }
    }
}
