//! Loan Advisor server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use advisor_config::{load_settings, Settings};
use advisor_llm::GroqBackend;
use advisor_pipeline::{Collaborators, ExchangePipeline};
use advisor_rag::AssistantClient;
use advisor_server::{create_router, init_metrics, AppState};
use advisor_speech::SarvamClient;
use advisor_store::{QueryLog, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("ADVISOR_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: failed to load config: {e}. Using defaults.");
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?settings.environment,
        "starting loan advisor server"
    );

    let metrics_handle = init_metrics();
    tracing::info!("Prometheus metrics at /metrics");

    let pipeline = build_pipeline(&settings)?;
    let state = AppState::new(pipeline, Arc::new(settings.clone()), metrics_handle);

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wire the external collaborators and assemble the pipeline
fn build_pipeline(settings: &Settings) -> Result<Arc<ExchangePipeline>, Box<dyn std::error::Error>> {
    let speech = Arc::new(SarvamClient::new(&settings.providers.speech)?);
    let reasoning = Arc::new(GroqBackend::new(settings.providers.reasoning.clone())?);

    // The retrieval assistant is optional: without a key the pipeline runs
    // with document context only
    let assistant = if settings.providers.retrieval.api_key.is_empty() {
        tracing::warn!("no retrieval API key configured, retrieval disabled");
        None
    } else {
        let client = AssistantClient::new(
            &settings.providers.retrieval,
            settings.providers.assistant_name.clone(),
        )?;
        Some(Arc::new(client) as Arc<dyn advisor_core::KnowledgeAssistant>)
    };

    let store = Arc::new(SessionStore::new());
    let queries = Arc::new(QueryLog::new());

    let pipeline = ExchangePipeline::new(
        Collaborators {
            stt: speech.clone(),
            translator: speech.clone(),
            synthesizer: speech.clone(),
            reasoning,
            assistant,
            document_parser: Some(speech),
        },
        store,
        queries,
        &settings.pipeline,
    );

    tracing::info!(
        model = %settings.providers.reasoning.model,
        confidence = settings.pipeline.confidence_enabled,
        "pipeline assembled"
    );

    Ok(Arc::new(pipeline))
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("advisor={level},tower_http=info").into()
    });

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
