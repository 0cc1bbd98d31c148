use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::Document;

/// File name of the serialized index inside the vector directory.
pub const INDEX_FILE: &str = "index.json";

/// A stored vector entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorEntry {
    document: Document,
    embedding: Vec<f32>,
}

/// On-disk layout of the index file.
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    model: String,
    dimensions: usize,
    entries: Vec<VectorEntry>,
}

/// In-memory vector store with disk persistence and cosine similarity search.
/// Built once, then read-only.
#[derive(Debug)]
pub struct VectorStore {
    model: String,
    dimensions: usize,
    entries: Vec<VectorEntry>,
}

#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

impl VectorStore {
    /// Whether `vector_dir` holds a saved index.
    pub fn exists(vector_dir: &Path) -> bool {
        vector_dir.join(INDEX_FILE).is_file()
    }

    /// Pair documents with their embeddings. `embeddings` must be parallel with
    /// `documents` and all vectors must share one width.
    pub fn from_documents(
        documents: Vec<Document>,
        embeddings: Vec<Vec<f32>>,
        model: &str,
    ) -> Result<Self> {
        if documents.len() != embeddings.len() {
            anyhow::bail!(
                "Got {} embeddings for {} documents",
                embeddings.len(),
                documents.len()
            );
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
            anyhow::bail!(
                "Inconsistent embedding width: expected {dimensions}, got {}",
                bad.len()
            );
        }

        let entries = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| VectorEntry {
                document,
                embedding,
            })
            .collect();

        Ok(Self {
            model: model.to_string(),
            dimensions,
            entries,
        })
    }

    pub fn load(vector_dir: &Path) -> Result<Self> {
        let path = vector_dir.join(INDEX_FILE);
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read vector store at {}", path.display()))?;
        let persisted: PersistedIndex =
            serde_json::from_str(&data).context("Failed to parse vector store")?;

        Ok(Self {
            model: persisted.model,
            dimensions: persisted.dimensions,
            entries: persisted.entries,
        })
    }

    /// Persist to `vector_dir` (atomic write via temp file + rename).
    pub fn save(&self, vector_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(vector_dir)
            .with_context(|| format!("Failed to create {}", vector_dir.display()))?;

        let persisted = PersistedIndex {
            model: self.model.clone(),
            dimensions: self.dimensions,
            entries: self.entries.clone(),
        };
        let data = serde_json::to_string(&persisted)?;

        let path = vector_dir.join(INDEX_FILE);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// The `k` entries most similar to `query_embedding`, best first.
    pub fn similarity_search(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredDocument> {
        let mut scored: Vec<(f32, &VectorEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(score, e)| ScoredDocument {
                document: e.document.clone(),
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|e| &e.document)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
