pub mod chat;
pub mod embeddings;

pub use chat::{build_chat_model, ChatModel, HttpChatModel};
pub use embeddings::{build_embedder, Embedder, HashEmbedder, HttpEmbedder};
