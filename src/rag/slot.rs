use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::SetupError;
use crate::llm::{build_chat_model, build_embedder};
use crate::rag::RagPipeline;
use crate::search::open_or_build;

/// Assembles a ready-to-serve pipeline.
#[async_trait]
pub trait PipelineFactory: Send + Sync {
    async fn build(&self) -> Result<RagPipeline>;
}

/// Builds the pipeline from process configuration: HTTP chat model, the
/// configured embedder, and the on-disk index (built on first run).
pub struct ConfiguredFactory {
    config: Config,
    client: reqwest::Client,
}

impl ConfiguredFactory {
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl PipelineFactory for ConfiguredFactory {
    async fn build(&self) -> Result<RagPipeline> {
        if self.config.requires_api_key() && self.config.llm.api_key.is_none() {
            return Err(SetupError::MissingApiKey("GROQ_API_KEY").into());
        }

        let chat = build_chat_model(&self.client, &self.config.llm)?;
        let embedder = build_embedder(&self.client, &self.config.embedding)?;
        let store = open_or_build(&self.config.index, embedder.as_ref()).await?;

        Ok(RagPipeline::new(
            chat,
            embedder,
            store,
            self.config.retriever_k,
            self.config.assistant_name.clone(),
        ))
    }
}

/// Holds the shared pipeline once built. A failed build leaves the slot empty
/// so the next caller tries again; concurrent callers wait on one build.
pub struct PipelineSlot {
    factory: Arc<dyn PipelineFactory>,
    current: tokio::sync::Mutex<Option<Arc<RagPipeline>>>,
}

impl PipelineSlot {
    pub fn new(factory: Arc<dyn PipelineFactory>) -> Self {
        Self {
            factory,
            current: tokio::sync::Mutex::new(None),
        }
    }

    /// The shared pipeline, building it first if needed. `None` if the build failed.
    pub async fn get_or_init(&self) -> Option<Arc<RagPipeline>> {
        let mut current = self.current.lock().await;
        if let Some(pipeline) = current.as_ref() {
            return Some(Arc::clone(pipeline));
        }

        match self.factory.build().await {
            Ok(pipeline) => {
                tracing::info!(
                    "RAG pipeline initialized ({} chunks indexed)",
                    pipeline.store().len()
                );
                let pipeline = Arc::new(pipeline);
                *current = Some(Arc::clone(&pipeline));
                Some(pipeline)
            }
            Err(e) => {
                tracing::error!("Failed to initialize RAG pipeline: {e:#}");
                None
            }
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.current.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.index.vector_dir = dir.path().join("vector_store");
        config.index.documents_dir = dir.path().join("documents");

        let factory = ConfiguredFactory::new(config, reqwest::Client::new());
        let err = factory.build().await.err().unwrap();
        assert_eq!(err.to_string(), "GROQ_API_KEY is not set in environment variables");
        assert!(!dir.path().join("vector_store").exists());
    }

    #[tokio::test]
    async fn test_slot_stays_empty_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.index.vector_dir = dir.path().join("vector_store");

        let slot = PipelineSlot::new(Arc::new(ConfiguredFactory::new(
            config,
            reqwest::Client::new(),
        )));
        assert!(slot.get_or_init().await.is_none());
        assert!(!slot.is_ready().await);
    }

    #[tokio::test]
    async fn test_offline_build_with_hash_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.llm.api_key = Some("test-key".into());
        config.embedding.provider = "hash".into();
        config.index.vector_dir = dir.path().join("vector_store");
        config.index.documents_dir = dir.path().join("documents");

        let slot = PipelineSlot::new(Arc::new(ConfiguredFactory::new(
            config,
            reqwest::Client::new(),
        )));
        let first = slot.get_or_init().await.unwrap();
        let second = slot.get_or_init().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.store().len(), 1);
        assert!(dir.path().join("vector_store").join("index.json").exists());
    }
}
