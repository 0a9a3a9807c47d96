//! Centralized constants
//!
//! Single source of truth for the limits and fixed strings the pipeline's
//! behavior is specified against. Keeping them here prevents the drift that
//! happens when each stage hardcodes its own copy.

/// Session history limits
pub mod history {
    /// Maximum messages retained per session; oldest are evicted first
    pub const MAX_MESSAGES: usize = 50;
}

/// Translation chunking
pub mod translate {
    /// Per-call character budget of the translation service, minus headroom
    pub const MAX_CHUNK_CHARS: usize = 900;

    /// Terminal punctuation treated as a sentence boundary. Includes the
    /// Devanagari danda and double danda used across Indic scripts.
    pub const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '\u{0964}', '\u{0965}'];
}

/// Speech synthesis chunking
pub mod tts {
    /// Per-call character budget of the synthesis service (hard limit 500)
    pub const MAX_CHUNK_CHARS: usize = 450;

    /// Sample rate requested from the synthesis service
    pub const SAMPLE_RATE: u32 = 22050;
}

/// Store-and-forward messaging delivery
pub mod messaging {
    /// Maximum characters per delivered segment
    pub const MAX_SEGMENT_CHARS: usize = 1600;

    /// Glyph substituted for `*` / `-` Markdown bullets
    pub const BULLET: &str = "\u{2022}";
}

/// Document upload and analysis
pub mod document {
    /// Pages parsed per uploaded document
    pub const MAX_PAGES: u32 = 5;

    /// Length of the summary excerpt cached per document
    pub const SUMMARY_EXCERPT_CHARS: usize = 500;
}

/// Confidence scoring
pub mod confidence {
    /// Neutral score substituted when the scorer's output cannot be parsed
    pub const NEUTRAL_SCORE: u8 = 50;
}

/// Recent-queries log
pub mod queries {
    /// Entries returned by the recent-queries listing
    pub const RECENT_LIMIT: usize = 10;

    /// Loan type recorded when the reply names none
    pub const DEFAULT_LOAN_TYPE: &str = "General";
}

/// Fixed user-facing strings
pub mod responses {
    /// Substituted as `result` when the reasoning output cannot be decoded
    pub const FALLBACK_APOLOGY: &str =
        "I apologize, but I couldn't process your request. Please try again.";

    /// Shown when a reply renders to nothing at all
    pub const GENERIC_FAILURE: &str = "I couldn't process your request.";

    /// Deterministic reply for one- and two-word inputs
    pub const SHORT_GREETING: &str =
        "Hello! I'm your loan advisor. Ask me about loan types, interest rates, \
         eligibility, or repayment options.";

    /// Appended to additional_info when a tool call fails
    pub const TOOL_FAILURE_NOTE: &str =
        "Could not retrieve detailed information for this request.";

    /// Maximum whitespace-separated words that trigger the greeting shortcut
    pub const GREETING_SHORTCUT_MAX_WORDS: usize = 2;
}
