//! Loan Advisor Server
//!
//! Two front ends over the same pipeline: a WebSocket event channel for
//! live chat/voice, and a store-and-forward messaging webhook. Plus the
//! document upload, recent-queries, health, and metrics endpoints.

pub mod http;
pub mod metrics;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_request};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upload error: {0}")]
    Upload(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Upload(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Short, user-visible message for a pipeline error. Internal detail stays
/// in the logs.
pub fn user_message(err: &advisor_core::Error) -> &'static str {
    match err {
        advisor_core::Error::Transcription(_) => "Failed to convert audio to text.",
        advisor_core::Error::Document(_) => "Failed to process the document.",
        _ => "Something went wrong while processing your message.",
    }
}
