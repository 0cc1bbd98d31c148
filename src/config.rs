use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server port (bound on all interfaces)
    pub port: u16,
    /// Chat-completion provider configuration
    pub llm: LlmConfig,
    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,
    /// Index location and chunking parameters
    pub index: IndexConfig,
    /// Number of chunks retrieved per question
    pub retriever_k: usize,
    /// Maximum history entries kept per session
    pub history_limit: usize,
    /// Persona name used in prompts and the status message
    pub assistant_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" (any OpenAI-compatible API) or "ollama"
    pub provider: String,
    /// Base URL for the completion API
    pub base_url: String,
    /// Model name for chat completions
    pub chat_model: String,
    /// API key (not needed for ollama)
    pub api_key: Option<String>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama", "openai" or "hash"
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Vector width for the hash provider
    pub dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the serialized index
    pub vector_dir: PathBuf,
    /// Directory holding the source documents
    pub documents_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            index: IndexConfig::default(),
            retriever_k: 3,
            history_limit: 20,
            assistant_name: "Arunabha".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            chat_model: "openai/gpt-oss-120b".to_string(),
            api_key: None,
            temperature: 0.7,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            api_key: None,
            dim: 384,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            vector_dir: PathBuf::from("vector_store"),
            documents_dir: PathBuf::from("documents"),
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = var("PORT").and_then(|v| v.parse().ok()) {
            config.port = v;
        }

        // Completion API
        if let Some(key) = var("GROQ_API_KEY").or_else(|| var("LLM_API_KEY")) {
            if !key.trim().is_empty() {
                config.llm.api_key = Some(key);
            }
        }
        if let Some(provider) = var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Some(url) = var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Some(v) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            config.llm.temperature = v;
        }

        // Embeddings
        if let Some(provider) = var("EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Some(url) = var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Some(model) = var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Some(key) = var("EMBEDDING_API_KEY") {
            config.embedding.api_key = Some(key);
        }
        if let Some(v) = var("EMBEDDING_DIM").and_then(|v| v.parse().ok()) {
            config.embedding.dim = v;
        }

        // Index
        if let Some(dir) = var("VECTOR_DIR") {
            config.index.vector_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("DOCUMENTS_DIR") {
            config.index.documents_dir = PathBuf::from(dir);
        }
        if let Some(v) = var("CHUNK_SIZE").and_then(|v| v.parse().ok()) {
            config.index.chunk_size = v;
        }
        if let Some(v) = var("CHUNK_OVERLAP").and_then(|v| v.parse().ok()) {
            config.index.chunk_overlap = v;
        }

        if let Some(v) = var("RETRIEVER_K").and_then(|v| v.parse().ok()) {
            config.retriever_k = v;
        }
        if let Some(v) = var("HISTORY_LIMIT").and_then(|v| v.parse().ok()) {
            config.history_limit = v;
        }
        if let Some(name) = var("ASSISTANT_NAME") {
            config.assistant_name = name;
        }

        config
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Whether the configured completion provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        self.llm.provider != "ollama"
    }
}
