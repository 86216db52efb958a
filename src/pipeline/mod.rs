//! Topic-to-grounded-chat pipeline
//!
//! Runs the full preparation sequence for a research topic: search for
//! papers, download their PDFs into a scratch directory, upload them to the
//! file store, wait until the provider can answer questions over them, then
//! open a grounded chat session. Individual download failures exclude that
//! paper and narrate the skip; every other stage failure aborts the run.

pub mod builder;
pub mod fetch;
pub mod ingest;

pub use builder::SessionBuilder;
pub use ingest::Ingestor;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::providers::{ChatProvider, ChatSession, FileStoreProvider, SearchProvider};
use crate::session::Transport;

pub struct GroundingPipeline {
    search: Arc<dyn SearchProvider>,
    downloader: Client,
    ingestor: Ingestor,
    builder: SessionBuilder,
    max_results: usize,
}

impl GroundingPipeline {
    pub fn new(
        config: &AppConfig,
        search: Arc<dyn SearchProvider>,
        store: Arc<dyn FileStoreProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        let downloader = Client::builder()
            .timeout(Duration::from_secs(config.download.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            search,
            downloader,
            ingestor: Ingestor::new(store, &config.ingest),
            builder: SessionBuilder::new(chat, &config.chat),
            max_results: config.search.max_results,
        }
    }

    /// Prepare documents for `topic` and open a chat session over them.
    ///
    /// Progress is narrated through `transport` as each document lands, so
    /// the user sees which papers made it into the session and which were
    /// skipped.
    pub async fn run(
        &self,
        topic: &str,
        dir: &Path,
        transport: &dyn Transport,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn ChatSession>> {
        info!(
            provider = self.search.name(),
            %topic,
            max_results = self.max_results,
            "Searching for papers"
        );
        let records = self.search.search(topic, self.max_results).await?;

        transport
            .send(&format!("Downloading documents regarding {topic}.\n"))
            .await?;

        let mut local = Vec::new();
        for record in &records {
            match fetch::download_pdf(&self.downloader, record, dir).await {
                Ok(path) => {
                    info!(title = %record.title, path = %path.display(), "Downloaded paper");
                    transport
                        .send(&format!(
                            "Document '{}' downloaded successfully!\n",
                            record.title
                        ))
                        .await?;
                    local.push(path);
                }
                Err(e) => {
                    warn!(title = %record.title, error = %e, "Skipping paper");
                    transport
                        .send(&format!(
                            "Document '{}' could not be downloaded and will be skipped.\n",
                            record.title
                        ))
                        .await?;
                }
            }
        }

        let handles = self.ingestor.ingest(&local).await?;
        let handles = self.ingestor.await_active(handles, cancel).await?;
        self.builder.build(&handles).await
    }
}
