//! Grounded chat provider traits

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RemoteFile;

/// A live document-grounded chat session
///
/// Sessions own their conversation context; every `send` extends it.
#[async_trait]
pub trait ChatSession: Send {
    /// Send one user message and return the model's reply text
    async fn send(&mut self, text: &str) -> Result<String>;
}

/// Trait for opening grounded chat sessions
///
/// Implementations:
/// - `GeminiChat`: Gemini generateContent API
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Open a session whose first turn references `files` and carries the
    /// grounding `instruction`
    async fn start_session(
        &self,
        files: &[RemoteFile],
        instruction: &str,
    ) -> Result<Box<dyn ChatSession>>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
