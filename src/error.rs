use thiserror::Error;

/// Failures that keep the RAG pipeline from being assembled.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("{0} is not set in environment variables")]
    MissingApiKey(&'static str),

    #[error("Unknown {kind} provider: {name}")]
    UnknownProvider { kind: &'static str, name: String },

    #[error("Invalid chunking parameters: overlap {overlap} must be smaller than size {size}")]
    InvalidChunking { size: usize, overlap: usize },
}
