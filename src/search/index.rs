use anyhow::{Context, Result};

use crate::chunking::RecursiveCharacterSplitter;
use crate::config::IndexConfig;
use crate::documents::{load_documents, placeholder};
use crate::llm::Embedder;
use crate::search::vector::VectorStore;

/// Open the saved index, or build one from the source documents and save it.
///
/// When an index already exists the documents directory is not read at all.
pub async fn open_or_build(config: &IndexConfig, embedder: &dyn Embedder) -> Result<VectorStore> {
    if VectorStore::exists(&config.vector_dir) {
        tracing::info!("Loading existing vector store...");
        let dir = config.vector_dir.clone();
        let store = tokio::task::spawn_blocking(move || VectorStore::load(&dir))
            .await
            .context("Vector store load task failed")??;

        if store.model_name() != embedder.model_name() {
            tracing::warn!(
                "Vector store was built with '{}' but the configured embedding model is '{}'",
                store.model_name(),
                embedder.model_name()
            );
        }
        tracing::info!("Loaded {} chunks from {}", store.len(), config.vector_dir.display());
        return Ok(store);
    }

    tracing::info!("Creating new vector store. Please wait...");
    build(config, embedder).await
}

async fn build(config: &IndexConfig, embedder: &dyn Embedder) -> Result<VectorStore> {
    let splitter = RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap)?;

    let docs_dir = config.documents_dir.clone();
    let documents = tokio::task::spawn_blocking(move || load_documents(&docs_dir))
        .await
        .context("Document load task failed")?;

    let mut chunks = splitter.split_documents(&documents);
    if chunks.is_empty() {
        tracing::warn!("Source documents produced no text. Indexing a placeholder document.");
        chunks = splitter.split_documents(&[placeholder()]);
    }
    tracing::info!("Split {} documents into {} chunks", documents.len(), chunks.len());

    let texts: Vec<String> = chunks.iter().map(|c| c.page_content.clone()).collect();
    let embeddings = embedder
        .embed_documents(&texts)
        .await
        .context("Failed to embed document chunks")?;

    let store = VectorStore::from_documents(chunks, embeddings, embedder.model_name())?;
    let vector_dir = config.vector_dir.clone();
    let store = tokio::task::spawn_blocking(move || store.save(&vector_dir).map(|()| store))
        .await
        .context("Vector store save task failed")??;

    tracing::info!("Vector store created and saved.");
    Ok(store)
}
