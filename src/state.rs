use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::rag::{ConfiguredFactory, HistoryStore, PipelineFactory, PipelineSlot};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub history: Arc<HistoryStore>,
    pub pipeline: Arc<PipelineSlot>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        let factory = ConfiguredFactory::new(config.clone(), http_client);
        Ok(Self::with_factory(config, Arc::new(factory)))
    }

    /// State around a caller-supplied pipeline factory.
    pub fn with_factory(config: Config, factory: Arc<dyn PipelineFactory>) -> Self {
        let history = HistoryStore::new(config.history_limit);
        Self {
            config,
            history: Arc::new(history),
            pipeline: Arc::new(PipelineSlot::new(factory)),
        }
    }
}
