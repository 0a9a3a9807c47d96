//! Language tags and the language-to-voice mapping
//!
//! Language codes follow the BCP-47 style tags the speech services accept
//! (`hi-IN`, `ta-IN`, ...). The pipeline reasons in English and bridges
//! other languages through the translation collaborator.

/// Fallback language when a request carries no hint
pub const DEFAULT_LANGUAGE: &str = "en-IN";

/// The language the reasoning collaborator is prompted in
pub const REASONING_LANGUAGE: &str = "en-IN";

/// Languages the speech services are known to handle
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en-IN", "hi-IN", "ta-IN", "te-IN", "kn-IN", "ml-IN", "mr-IN", "bn-IN", "gu-IN",
];

/// Whether a tag is an English variant (no bridging needed)
pub fn is_english(tag: &str) -> bool {
    tag.starts_with("en")
}

/// Voice to request from the synthesis collaborator for a language.
///
/// Every supported language currently maps to the same multilingual voice;
/// the mapping stays explicit so per-language voices can be introduced
/// without touching call sites.
pub fn speaker_for(tag: &str) -> &'static str {
    match tag {
        "hi-IN" | "en-IN" | "ta-IN" | "te-IN" | "kn-IN" | "ml-IN" | "mr-IN" | "bn-IN"
        | "gu-IN" => "meera",
        _ => "meera",
    }
}

/// Resolve a possibly-absent hint to a concrete tag
pub fn resolve_hint(hint: Option<&str>) -> String {
    match hint {
        Some(tag) if !tag.trim().is_empty() => tag.trim().to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_detection() {
        assert!(is_english("en-IN"));
        assert!(is_english("en-US"));
        assert!(!is_english("hi-IN"));
    }

    #[test]
    fn test_speaker_mapping_covers_unknown_tags() {
        assert_eq!(speaker_for("hi-IN"), "meera");
        assert_eq!(speaker_for("fr-FR"), "meera");
    }

    #[test]
    fn test_resolve_hint() {
        assert_eq!(resolve_hint(None), DEFAULT_LANGUAGE);
        assert_eq!(resolve_hint(Some("  ")), DEFAULT_LANGUAGE);
        assert_eq!(resolve_hint(Some("kn-IN")), "kn-IN");
    }
}
