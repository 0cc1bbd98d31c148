//! Retrieval-augmented answering: prompts, the pipeline itself, the shared
//! slot that builds it lazily, and the bounded chat history.

pub mod history;
pub mod pipeline;
pub mod prompts;
pub mod slot;

pub use history::{HistoryStore, DEFAULT_SESSION};
pub use pipeline::{RagAnswer, RagPipeline};
pub use slot::{ConfiguredFactory, PipelineFactory, PipelineSlot};
