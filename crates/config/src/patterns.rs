//! Field-extraction patterns for uploaded documents
//!
//! The patterns deliberately anchor on a keyword and then skip to the next
//! number, which tolerates the noisy spacing that survives markup cleanup.

/// Loan amount: keyword, then the first comma-grouped number
pub const LOAN_AMOUNT: &str = r"(?i)(?:loan|amount|principal)[^\d]*([\d,]+(?:\.\d+)?)";

/// Interest rate: keyword, then a number followed by a percent sign
pub const INTEREST_RATE: &str = r"(?i)(?:interest|rate)[^\d]*(\d+(?:\.\d+)?)\s*%";

/// Loan term: keyword, then a number with a year/month unit
pub const LOAN_TERM: &str = r"(?i)(?:term|period|duration)[^\d]*(\d+)\s*(?:year|yr|month|mo)";

/// Markup tags left behind by the document parser
pub const MARKUP_TAG: &str = r"<[^>]+>";

/// Runs of whitespace collapsed after tag removal
pub const WHITESPACE_RUN: &str = r"\s+";
