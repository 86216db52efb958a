//! Document ingestion and processing-state polling

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::providers::FileStoreProvider;
use crate::types::RemoteFile;

/// Uploads local documents to a file store and waits for them to become
/// queryable.
pub struct Ingestor {
    store: Arc<dyn FileStoreProvider>,
    poll_interval: Duration,
    max_wait: Duration,
}

impl Ingestor {
    pub fn new(store: Arc<dyn FileStoreProvider>, config: &IngestConfig) -> Self {
        Self {
            store,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            max_wait: Duration::from_secs(config.max_wait_secs),
        }
    }

    /// Upload every document in order, returning the provider handles.
    pub async fn ingest(&self, paths: &[PathBuf]) -> Result<Vec<RemoteFile>> {
        if paths.is_empty() {
            return Err(Error::ingestion("no documents to ingest"));
        }

        let mut handles = Vec::with_capacity(paths.len());
        for path in paths {
            let mime_type = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            info!(
                provider = self.store.name(),
                path = %path.display(),
                %mime_type,
                "Uploading document"
            );
            let handle = self.store.upload(path, &mime_type).await?;
            info!(name = %handle.name, display_name = %handle.display_name, "Upload accepted");
            handles.push(handle);
        }
        Ok(handles)
    }

    /// Poll the store until every handle is active.
    ///
    /// A file the provider marks failed aborts the wait immediately, as does
    /// cancellation. The deadline counts from the first poll, not per file.
    pub async fn await_active(
        &self,
        mut handles: Vec<RemoteFile>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteFile>> {
        let started = Instant::now();

        loop {
            for handle in handles.iter_mut() {
                if handle.is_active() {
                    continue;
                }
                let state = self.store.get_state(&handle.name).await?;
                if state == crate::types::ProcessingState::Failed {
                    return Err(Error::Processing {
                        file: handle.display_name.clone(),
                    });
                }
                handle.state = state;
            }

            let pending = handles.iter().filter(|h| !h.is_active()).count();
            if pending == 0 {
                info!(count = handles.len(), "All documents active");
                return Ok(handles);
            }

            let waited = started.elapsed();
            if waited >= self.max_wait {
                return Err(Error::ProcessingTimeout {
                    waited_secs: waited.as_secs(),
                });
            }

            debug!(pending, "Documents still processing");
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}
