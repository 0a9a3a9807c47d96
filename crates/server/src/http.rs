//! HTTP routes

use axum::extract::{Multipart, State};
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use advisor_pipeline::messaging_segments;

use crate::state::AppState;
use crate::websocket::ws_handler;
use crate::{metrics, user_message, ServerError};

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server.cors_origins);

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(render_metrics))
        .route("/recent-queries", get(recent_queries))
        .route("/documents", post(upload_document))
        .route("/webhook/messaging", post(messaging_webhook))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

async fn recent_queries(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.queries().recent())
}

/// Store-and-forward inbound message: the sender address is the session id
/// and the reply is returned as chunked plain-text segments.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body")]
    pub body: String,
}

async fn messaging_webhook(
    State(state): State<AppState>,
    Form(inbound): Form<InboundMessage>,
) -> Result<Json<Vec<String>>, ServerError> {
    metrics::record_request("messaging");
    let started = std::time::Instant::now();

    if inbound.body.trim().is_empty() {
        return Err(ServerError::InvalidRequest("empty message body".into()));
    }

    let outcome = state
        .pipeline
        .handle_text(&inbound.from, inbound.body.trim(), None, false)
        .await
        .map_err(|e| {
            metrics::record_error(e.stage());
            tracing::error!(session_id = %inbound.from, error = %e, "messaging exchange failed");
            ServerError::Internal(user_message(&e).to_string())
        })?;

    metrics::record_exchange_latency("messaging", started.elapsed().as_secs_f64());
    Ok(Json(messaging_segments(&outcome.text)))
}

async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ServerError> {
    metrics::record_request("upload");

    let mut file_name: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;
    let mut session_id: Option<String> = None;
    let mut target_language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Upload(e.to_string()))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(String::from);
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ServerError::Upload(e.to_string()))?
                        .to_vec(),
                );
            }
            Some("session_id") => {
                session_id = field.text().await.ok();
            }
            Some("target_language") => {
                target_language = field.text().await.ok().filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let content =
        content.ok_or_else(|| ServerError::InvalidRequest("no file in the request".into()))?;
    if content.is_empty() {
        return Err(ServerError::InvalidRequest("no file selected".into()));
    }
    let file_name = file_name.unwrap_or_else(|| "document.pdf".to_string());
    let session_id = session_id
        .ok_or_else(|| ServerError::InvalidRequest("session_id is required".into()))?;

    let document = state
        .pipeline
        .ingest_document(
            &session_id,
            &file_name,
            &content,
            target_language.as_deref(),
        )
        .await
        .map_err(|e| {
            metrics::record_error(e.stage());
            tracing::error!(session_id, file_name, error = %e, "document upload failed");
            ServerError::Upload(user_message(&e).to_string())
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "filename": document.file_name,
        "pages_processed": document.pages_processed,
        "total_pages": document.total_pages,
        "extracted_fields": document.extracted_fields,
        "summary_excerpt": document.summary_excerpt,
        "translated": document.translated_text.is_some(),
    })))
}
