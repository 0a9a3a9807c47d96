//! Session store
//!
//! One entry per conversational participant, keyed by an opaque id (a
//! transport connection id or a messaging sender address). Sessions are
//! created on first contact and never explicitly destroyed.

use std::collections::VecDeque;

use dashmap::DashMap;

use advisor_config::constants::history::MAX_MESSAGES;
use advisor_core::{ChatMessage, DocumentContext};

/// State held for one session
#[derive(Debug, Default)]
struct SessionState {
    /// Sticky language: set on first detection/declaration, changed only
    /// when the caller explicitly supplies a different tag
    preferred_language: Option<String>,
    /// Bounded history, oldest first
    history: VecDeque<ChatMessage>,
    /// Last uploaded document, replaced wholesale on re-upload
    last_document: Option<DocumentContext>,
}

/// Read-only copy of a session's state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub preferred_language: Option<String>,
    pub history: Vec<ChatMessage>,
    pub last_document: Option<DocumentContext>,
}

/// Concurrent session store with bounded per-session history.
///
/// Insert/evict are safe to call from any number of request tasks; each
/// operation locks only the shard holding the session.
pub struct SessionStore {
    sessions: DashMap<String, SessionState>,
    max_history: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_history_limit(MAX_MESSAGES)
    }

    pub fn with_history_limit(max_history: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_history,
        }
    }

    /// Append a message, evicting the oldest entries past the cap
    pub fn push_message(&self, session_id: &str, message: ChatMessage) {
        let mut entry = self.sessions.entry(session_id.to_string()).or_default();
        entry.history.push_back(message);
        while entry.history.len() > self.max_history {
            entry.history.pop_front();
        }
    }

    /// History oldest-first, empty for unknown sessions
    pub fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .get(session_id)
            .map(|s| s.history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// History formatted for the reasoning prompt: one `Speaker: text` line
    /// per turn, oldest first
    pub fn history_as_text(&self, session_id: &str, agent_name: &str) -> String {
        self.sessions
            .get(session_id)
            .map(|s| {
                s.history
                    .iter()
                    .map(|m| {
                        let speaker = if m.is_user { "User" } else { agent_name };
                        format!("{speaker}: {}", m.text)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }

    /// Resolve the session's language: the sticky preference wins unless the
    /// caller explicitly declared a tag, which also updates the preference.
    pub fn resolve_language(&self, session_id: &str, declared: Option<&str>) -> Option<String> {
        let mut entry = self.sessions.entry(session_id.to_string()).or_default();
        if let Some(tag) = declared {
            if entry.preferred_language.as_deref() != Some(tag) {
                tracing::debug!(session_id, language = tag, "session language set");
                entry.preferred_language = Some(tag.to_string());
            }
        }
        entry.preferred_language.clone()
    }

    /// Cache a parsed document, replacing any previous one
    pub fn set_document(&self, session_id: &str, document: DocumentContext) {
        let mut entry = self.sessions.entry(session_id.to_string()).or_default();
        tracing::debug!(
            session_id,
            file_name = %document.file_name,
            "cached document for session"
        );
        entry.last_document = Some(document);
    }

    pub fn document(&self, session_id: &str) -> Option<DocumentContext> {
        self.sessions
            .get(session_id)
            .and_then(|s| s.last_document.clone())
    }

    /// Full copy of a session's state, if it exists
    pub fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.sessions.get(session_id).map(|s| SessionSnapshot {
            preferred_language: s.preferred_language.clone(),
            history: s.history.iter().cloned().collect(),
            last_document: s.last_document.clone(),
        })
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_capped_with_fifo_eviction() {
        let store = SessionStore::new();
        for i in 0..60 {
            store.push_message("s1", ChatMessage::user(format!("message {i}"), None));
        }

        let history = store.history("s1");
        assert_eq!(history.len(), MAX_MESSAGES);
        // The earliest 10 messages were evicted
        assert_eq!(history[0].text, "message 10");
        for i in 0..10 {
            assert!(!history.iter().any(|m| m.text == format!("message {i}")));
        }
        assert_eq!(history.last().unwrap().text, "message 59");
    }

    #[test]
    fn test_history_as_text_labels_speakers() {
        let store = SessionStore::new();
        store.push_message("s1", ChatMessage::user("what are home loan rates?", None));
        store.push_message("s1", ChatMessage::bot("They start at 8.5%.", None));

        let text = store.history_as_text("s1", "FinMate");
        assert_eq!(
            text,
            "User: what are home loan rates?\nFinMate: They start at 8.5%."
        );
    }

    #[test]
    fn test_language_is_sticky_until_redeclared() {
        let store = SessionStore::new();
        assert_eq!(store.resolve_language("s1", None), None);
        assert_eq!(
            store.resolve_language("s1", Some("hi-IN")).as_deref(),
            Some("hi-IN")
        );
        // Sticks across requests with no declaration
        assert_eq!(store.resolve_language("s1", None).as_deref(), Some("hi-IN"));
        // Explicit change wins
        assert_eq!(
            store.resolve_language("s1", Some("ta-IN")).as_deref(),
            Some("ta-IN")
        );
    }

    #[test]
    fn test_document_replaced_wholesale() {
        let store = SessionStore::new();
        let first = DocumentContext {
            file_name: "a.pdf".into(),
            ..Default::default()
        };
        let second = DocumentContext {
            file_name: "b.pdf".into(),
            ..Default::default()
        };
        store.set_document("s1", first);
        store.set_document("s1", second);
        assert_eq!(store.document("s1").unwrap().file_name, "b.pdf");
        assert!(store.document("other").is_none());
    }
}
