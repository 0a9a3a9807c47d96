//! Per-request state machine
//!
//! `Received → Transcribed → TranslatedIn → ContextRetrieved → Answered →
//! TranslatedOut → Rendered → Delivered`, with `TranscriptionFailed` as the
//! only terminal failure and `AnswerFallback` as a soft failure inside the
//! answering stage. Conditional stages (transcription, either translation)
//! are simply skipped for requests that do not need them.

/// Stages a request passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Transcribed,
    TranslatedIn,
    ContextRetrieved,
    Answered,
    /// Soft failure: the answer is the default apology, pipeline continues
    AnswerFallback,
    TranslatedOut,
    Rendered,
    Delivered,
    /// Terminal failure: no further stages run
    TranscriptionFailed,
}

impl RequestState {
    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Received => "received",
            RequestState::Transcribed => "transcribed",
            RequestState::TranslatedIn => "translated_in",
            RequestState::ContextRetrieved => "context_retrieved",
            RequestState::Answered => "answered",
            RequestState::AnswerFallback => "answer_fallback",
            RequestState::TranslatedOut => "translated_out",
            RequestState::Rendered => "rendered",
            RequestState::Delivered => "delivered",
            RequestState::TranscriptionFailed => "transcription_failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Delivered | RequestState::TranscriptionFailed
        )
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tracks and logs one request's progress through the stages
pub struct RequestTrace {
    session_id: String,
    state: RequestState,
}

impl RequestTrace {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: RequestState::Received,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Move to the next stage, logging the transition with the session id
    pub fn advance(&mut self, next: RequestState) {
        tracing::debug!(
            session_id = %self.session_id,
            from = self.state.label(),
            to = next.label(),
            "request stage"
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RequestState::Delivered.is_terminal());
        assert!(RequestState::TranscriptionFailed.is_terminal());
        assert!(!RequestState::Answered.is_terminal());
        assert!(!RequestState::AnswerFallback.is_terminal());
    }

    #[test]
    fn test_trace_advances() {
        let mut trace = RequestTrace::new("s1");
        assert_eq!(trace.state(), RequestState::Received);
        trace.advance(RequestState::ContextRetrieved);
        trace.advance(RequestState::Delivered);
        assert!(trace.state().is_terminal());
    }
}
