//! Provider file-store trait for grounding documents

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::{ProcessingState, RemoteFile};

/// Trait for the generative provider's file store
///
/// Implementations:
/// - `GeminiFileStore`: Gemini File API
#[async_trait]
pub trait FileStoreProvider: Send + Sync {
    /// Upload a local file, returning its provider handle
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<RemoteFile>;

    /// Fetch the current lifecycle state of an uploaded file
    async fn get_state(&self, name: &str) -> Result<ProcessingState>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
