//! Provider file-store types

use serde::{Deserialize, Serialize};

/// Lifecycle state of a file uploaded to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    /// Upload accepted, provider-side extraction still running
    Pending,
    /// Ready to be referenced from a chat session
    Active,
    /// Provider-side processing failed; the file is unusable
    Failed,
}

/// Handle to a file in the provider file store
///
/// A chat session may only be grounded on handles whose state is `Active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Provider resource name (e.g. "files/abc-123")
    pub name: String,
    /// URI used to reference the file from chat content
    pub uri: String,
    /// Human-readable name recorded at upload
    pub display_name: String,
    /// MIME type recorded at upload
    pub mime_type: String,
    /// Last observed lifecycle state
    pub state: ProcessingState,
}

impl RemoteFile {
    /// Whether the provider has finished processing this file
    pub fn is_active(&self) -> bool {
        self.state == ProcessingState::Active
    }
}
