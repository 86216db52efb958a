//! Error types for the research chat pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Research chat errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Paper search failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// One document's download failed; callers exclude it and continue
    #[error("Failed to download '{title}': {message}")]
    Download { title: String, message: String },

    /// Upload or status poll against the provider file store failed
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// The provider marked an uploaded file as failed
    #[error("Provider could not process file '{file}'")]
    Processing { file: String },

    /// Uploaded files were still processing when the deadline passed
    #[error("Documents still processing after {waited_secs}s")]
    ProcessingTimeout { waited_secs: u64 },

    /// The session was cancelled mid-wait
    #[error("Operation cancelled")]
    Cancelled,

    /// Grounded session construction failed
    #[error("Session build error: {0}")]
    Build(String),

    /// Provider chat call failed
    #[error("Chat error: {0}")]
    Chat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create a per-document download error
    pub fn download(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create an ingestion error
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::Ingestion(message.into())
    }

    /// Create a session build error
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Create a chat error
    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat(message.into())
    }
}
