//! Paper search provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PaperRecord;

/// Trait for topic-based paper search
///
/// Implementations:
/// - `ArxivClient`: arXiv Atom API
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for papers matching a topic, ordered by service relevance
    async fn search(&self, topic: &str, max_results: usize) -> Result<Vec<PaperRecord>>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
