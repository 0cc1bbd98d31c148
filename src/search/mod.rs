//! Similarity index: cosine k-NN over embedded chunks, persisted as one file.

pub mod index;
pub mod vector;

pub use index::open_or_build;
pub use vector::{ScoredDocument, VectorStore};
