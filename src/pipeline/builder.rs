//! Grounded chat session construction

use std::sync::Arc;
use tracing::info;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::providers::{ChatProvider, ChatSession};
use crate::types::RemoteFile;

/// Opens chat sessions grounded in a set of active documents.
pub struct SessionBuilder {
    provider: Arc<dyn ChatProvider>,
    instruction: String,
}

impl SessionBuilder {
    pub fn new(provider: Arc<dyn ChatProvider>, config: &ChatConfig) -> Self {
        Self {
            provider,
            instruction: config.grounding_instruction.clone(),
        }
    }

    /// Start a session over `files`. Every file must already be active.
    pub async fn build(&self, files: &[RemoteFile]) -> Result<Box<dyn ChatSession>> {
        if files.is_empty() {
            return Err(Error::build("no documents to ground the session on"));
        }
        if let Some(file) = files.iter().find(|f| !f.is_active()) {
            return Err(Error::build(format!(
                "document '{}' is not active",
                file.display_name
            )));
        }

        info!(
            provider = self.provider.name(),
            count = files.len(),
            "Opening grounded chat session"
        );
        self.provider.start_session(files, &self.instruction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessingState;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct NoopSession;

    #[async_trait]
    impl ChatSession for NoopSession {
        async fn send(&mut self, _text: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    struct RecordingChat {
        seen: Mutex<Option<(usize, String)>>,
    }

    #[async_trait]
    impl ChatProvider for RecordingChat {
        async fn start_session(
            &self,
            files: &[RemoteFile],
            instruction: &str,
        ) -> Result<Box<dyn ChatSession>> {
            *self.seen.lock().unwrap() = Some((files.len(), instruction.to_string()));
            Ok(Box::new(NoopSession))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn active_file(name: &str) -> RemoteFile {
        RemoteFile {
            name: format!("files/{name}"),
            uri: format!("https://files.test/{name}"),
            display_name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            state: ProcessingState::Active,
        }
    }

    #[tokio::test]
    async fn test_passes_files_and_instruction_to_the_provider() {
        let provider = Arc::new(RecordingChat {
            seen: Mutex::new(None),
        });
        let builder = SessionBuilder::new(provider.clone(), &ChatConfig::default());

        builder
            .build(&[active_file("a.pdf"), active_file("b.pdf")])
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        let (count, instruction) = seen.as_ref().unwrap();
        assert_eq!(*count, 2);
        assert!(instruction.contains("answer questions based on"));
    }

    #[tokio::test]
    async fn test_rejects_an_empty_document_set() {
        let provider = Arc::new(RecordingChat {
            seen: Mutex::new(None),
        });
        let builder = SessionBuilder::new(provider.clone(), &ChatConfig::default());

        let err = match builder.build(&[]).await {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(matches!(err, Error::Build(_)));
        assert!(provider.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_documents_that_are_not_active() {
        let provider = Arc::new(RecordingChat {
            seen: Mutex::new(None),
        });
        let builder = SessionBuilder::new(provider.clone(), &ChatConfig::default());

        let mut stalled = active_file("stalled.pdf");
        stalled.state = ProcessingState::Pending;
        let err = match builder.build(&[active_file("ok.pdf"), stalled]).await {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };

        assert!(err.to_string().contains("stalled.pdf"));
        assert!(provider.seen.lock().unwrap().is_none());
    }
}
