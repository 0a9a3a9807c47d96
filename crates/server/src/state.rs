//! Shared application state

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use advisor_config::Settings;
use advisor_pipeline::ExchangePipeline;
use advisor_store::{QueryLog, SessionStore};

/// State injected into every handler. Constructed once at startup; there
/// are no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ExchangePipeline>,
    pub settings: Arc<Settings>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        pipeline: Arc<ExchangePipeline>,
        settings: Arc<Settings>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            pipeline,
            settings,
            metrics,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        self.pipeline.store()
    }

    pub fn queries(&self) -> &Arc<QueryLog> {
        self.pipeline.queries()
    }
}
