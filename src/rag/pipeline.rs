use anyhow::{Context, Result};
use std::sync::Arc;

use crate::llm::{ChatModel, Embedder};
use crate::models::ChatMessage;
use crate::rag::prompts::{answer_system_prompt, format_context, CONTEXTUALIZE_SYSTEM_PROMPT};
use crate::search::{ScoredDocument, VectorStore};

/// History-aware retrieval followed by a context-stuffed answer.
pub struct RagPipeline {
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    k: usize,
    assistant_name: String,
}

#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub answer: String,
    /// The query actually sent to the retriever
    pub standalone_question: String,
    pub context: Vec<ScoredDocument>,
}

impl RagPipeline {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        store: VectorStore,
        k: usize,
        assistant_name: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            embedder,
            store: Arc::new(store),
            k,
            assistant_name: assistant_name.into(),
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub async fn invoke(&self, input: &str, history: &[ChatMessage]) -> Result<RagAnswer> {
        let standalone_question = self.standalone_question(input, history).await?;
        let context = self.retrieve(&standalone_question).await?;
        tracing::debug!(
            "Retrieved {} chunks for query {standalone_question:?}",
            context.len()
        );

        let system = answer_system_prompt(&self.assistant_name, &format_context(&context));
        let messages = with_history(system, history, input);
        let answer = self
            .chat
            .complete(&messages)
            .await
            .context("Answer generation failed")?;

        Ok(RagAnswer {
            answer,
            standalone_question,
            context,
        })
    }

    /// The query to search with: the input itself when there is no history,
    /// otherwise the model's standalone rewrite of it.
    async fn standalone_question(&self, input: &str, history: &[ChatMessage]) -> Result<String> {
        if history.is_empty() {
            return Ok(input.to_string());
        }

        let messages = with_history(CONTEXTUALIZE_SYSTEM_PROMPT.to_string(), history, input);
        let rewritten = self
            .chat
            .complete(&messages)
            .await
            .context("Question rephrasing failed")?;

        let rewritten = rewritten.trim();
        if rewritten.is_empty() {
            Ok(input.to_string())
        } else {
            Ok(rewritten.to_string())
        }
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredDocument>> {
        let embedding = self
            .embedder
            .embed_query(query)
            .await
            .context("Query embedding failed")?;
        Ok(self.store.similarity_search(&embedding, self.k))
    }
}

fn with_history(system: String, history: &[ChatMessage], input: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(input));
    messages
}
