//! WebSocket event channel
//!
//! One connection = one session. Each inbound event is processed on its
//! own task so a slow external call never blocks the socket's read loop.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use advisor_core::ChatMessage;
use advisor_pipeline::{ExchangeOutcome, ExchangePipeline};

use crate::state::AppState;
use crate::{metrics, user_message};

/// Events accepted from the client
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Voice turn: base64 WAV, optional declared language, optional
    /// language auto-detection
    AudioMessage {
        audio: String,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        auto_detect: bool,
    },
    /// Text turn from the chat widget
    SendMessage {
        #[serde(default)]
        id: Option<String>,
        msg: String,
        #[serde(default)]
        language: Option<String>,
    },
    GetChatHistory,
    Ping,
}

/// Events emitted to the client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    SessionInfo {
        session_id: String,
    },
    Response {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
        language: String,
        timestamp: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        confidence: Option<u8>,
    },
    DetectedLanguage {
        language: String,
    },
    ChatHistory {
        messages: Vec<ChatMessage>,
    },
    Error {
        message: String,
    },
    Pong,
}

type WsSender = Arc<tokio::sync::Mutex<SplitSink<WebSocket, Message>>>;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_event(sender: &WsSender, event: &ServerEvent) {
    // Serialization of our own enum cannot fail; a send failure just means
    // the client went away
    if let Ok(json) = serde_json::to_string(event) {
        let mut s = sender.lock().await;
        let _ = s.send(Message::Text(json)).await;
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let session_id = uuid::Uuid::new_v4().to_string();
    let (sender, mut receiver) = socket.split();
    let sender: WsSender = Arc::new(tokio::sync::Mutex::new(sender));

    tracing::info!(session_id, "websocket connected");
    send_event(
        &sender,
        &ServerEvent::SessionInfo {
            session_id: session_id.clone(),
        },
    )
    .await;

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let event: ClientEvent = match serde_json::from_str(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(session_id, error = %e, "unrecognized client event");
                        send_event(
                            &sender,
                            &ServerEvent::Error {
                                message: "Unrecognized event.".to_string(),
                            },
                        )
                        .await;
                        continue;
                    }
                };

                match event {
                    ClientEvent::Ping => {
                        send_event(&sender, &ServerEvent::Pong).await;
                    }
                    ClientEvent::GetChatHistory => {
                        let messages = state.store().history(&session_id);
                        send_event(&sender, &ServerEvent::ChatHistory { messages }).await;
                    }
                    ClientEvent::SendMessage { id, msg, language } => {
                        // Callers may address a persistent chat id; the
                        // connection id is the default
                        let target = id.unwrap_or_else(|| session_id.clone());
                        spawn_text_exchange(
                            state.pipeline.clone(),
                            sender.clone(),
                            target,
                            msg,
                            language,
                        );
                    }
                    ClientEvent::AudioMessage {
                        audio,
                        language,
                        auto_detect,
                    } => {
                        spawn_audio_exchange(
                            state.pipeline.clone(),
                            sender.clone(),
                            session_id.clone(),
                            audio,
                            language,
                            auto_detect,
                        );
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                let mut s = sender.lock().await;
                let _ = s.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!(session_id, error = %e, "websocket receive error");
                break;
            }
            _ => {}
        }
    }

    tracing::info!(session_id, "websocket closed");
}

fn response_event(outcome: &ExchangeOutcome) -> ServerEvent {
    ServerEvent::Response {
        text: outcome.text.clone(),
        audio: outcome.audio_wav.as_ref().map(|wav| BASE64.encode(wav)),
        language: outcome.language.clone(),
        timestamp: outcome.timestamp.to_rfc3339(),
        confidence: outcome.confidence,
    }
}

fn spawn_text_exchange(
    pipeline: Arc<ExchangePipeline>,
    sender: WsSender,
    session_id: String,
    msg: String,
    language: Option<String>,
) {
    tokio::spawn(async move {
        metrics::record_request("chat");
        let started = std::time::Instant::now();

        match pipeline
            .handle_text(&session_id, &msg, language.as_deref(), false)
            .await
        {
            Ok(outcome) => {
                metrics::record_exchange_latency("chat", started.elapsed().as_secs_f64());
                send_event(&sender, &response_event(&outcome)).await;
            }
            Err(e) => {
                metrics::record_error(e.stage());
                tracing::error!(session_id, stage = e.stage(), error = %e, "chat exchange failed");
                send_event(
                    &sender,
                    &ServerEvent::Error {
                        message: user_message(&e).to_string(),
                    },
                )
                .await;
            }
        }
    });
}

fn spawn_audio_exchange(
    pipeline: Arc<ExchangePipeline>,
    sender: WsSender,
    session_id: String,
    audio: String,
    language: Option<String>,
    auto_detect: bool,
) {
    tokio::spawn(async move {
        metrics::record_request("voice");
        let started = std::time::Instant::now();

        match pipeline
            .handle_audio(&session_id, &audio, language.as_deref(), auto_detect)
            .await
        {
            Ok(outcome) => {
                metrics::record_exchange_latency("voice", started.elapsed().as_secs_f64());
                if let Some(detected) = &outcome.detected_language {
                    send_event(
                        &sender,
                        &ServerEvent::DetectedLanguage {
                            language: detected.clone(),
                        },
                    )
                    .await;
                }
                send_event(&sender, &response_event(&outcome)).await;
            }
            Err(e) => {
                metrics::record_error(e.stage());
                tracing::error!(session_id, stage = e.stage(), error = %e, "voice exchange failed");
                send_event(
                    &sender,
                    &ServerEvent::Error {
                        message: user_message(&e).to_string(),
                    },
                )
                .await;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_events_deserialize() {
        let audio: ClientEvent = serde_json::from_str(
            r#"{"type": "audio_message", "audio": "UklGRg==", "language": "hi-IN", "auto_detect": true}"#,
        )
        .unwrap();
        assert!(matches!(
            audio,
            ClientEvent::AudioMessage { auto_detect: true, .. }
        ));

        let text: ClientEvent =
            serde_json::from_str(r#"{"type": "send_message", "msg": "hello"}"#).unwrap();
        assert!(matches!(text, ClientEvent::SendMessage { id: None, .. }));
    }

    #[test]
    fn test_response_event_omits_absent_fields() {
        let event = ServerEvent::Response {
            text: "hi".into(),
            audio: None,
            language: "en-IN".into(),
            timestamp: "2025-01-01T00:00:00Z".into(),
            confidence: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("audio").is_none());
        assert!(json.get("confidence").is_none());
        assert_eq!(json["type"], "response");
    }
}
