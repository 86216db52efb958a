//! Two-phase research session
//!
//! A session starts out waiting for a topic: the first message it receives
//! is always treated as one, and triggers the grounding pipeline. Once the
//! pipeline hands back a chat session the research session is grounded for
//! the rest of its life, and every later message is a question for the
//! documents. A failed grounding attempt narrates the problem, cleans up the
//! scratch directory, and leaves the session waiting for the next topic.

pub mod scratch;
pub mod transport;

pub use scratch::ScratchDir;
pub use transport::{StdoutTransport, Transport};

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::GroundingPipeline;
use crate::providers::ChatSession;

/// Sent when the session opens and whenever it is ready for a new topic.
pub const GREETING: &str = "Which topic would you like to research?";

/// Sent once grounding succeeds.
pub const READY_PROMPT: &str =
    "I can now provide information regarding the documents above. What would you like to know?";

pub struct ResearchSession {
    id: Uuid,
    pipeline: GroundingPipeline,
    transport: Arc<dyn Transport>,
    scratch: ScratchDir,
    cancel: CancellationToken,
    chat: Option<Box<dyn ChatSession>>,
}

impl ResearchSession {
    pub fn new(
        config: &AppConfig,
        pipeline: GroundingPipeline,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let id = Uuid::new_v4();
        let scratch = ScratchDir::new(config.download.dir.join(id.to_string()));
        info!(%id, scratch = %scratch.path().display(), "Research session created");

        Self {
            id,
            pipeline,
            transport,
            scratch,
            cancel: CancellationToken::new(),
            chat: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True once a grounding attempt has succeeded.
    pub fn is_grounded(&self) -> bool {
        self.chat.is_some()
    }

    /// Token that aborts an in-flight grounding attempt when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    /// Greet the user and ask for a topic.
    pub async fn open(&self) -> Result<()> {
        self.transport.send(GREETING).await
    }

    /// Route one inbound message.
    ///
    /// An `Err` here means the transport itself failed; chat and grounding
    /// problems are delivered to the user as message content instead.
    pub async fn handle_message(&mut self, text: &str) -> Result<()> {
        match self.chat.as_mut() {
            None => self.ground(text).await,
            Some(chat) => {
                let reply = match chat.send(text).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "Chat turn failed");
                        e.to_string()
                    }
                };
                self.transport.send(&reply).await
            }
        }
    }

    async fn ground(&mut self, topic: &str) -> Result<()> {
        let attempt = async {
            self.scratch.ensure().await?;
            self.pipeline
                .run(
                    topic,
                    self.scratch.path(),
                    self.transport.as_ref(),
                    &self.cancel,
                )
                .await
        }
        .await;

        match attempt {
            Ok(chat) => {
                info!(id = %self.id, %topic, "Session grounded");
                self.chat = Some(chat);
                self.transport.send(READY_PROMPT).await
            }
            Err(e) => {
                error!(id = %self.id, %topic, error = %e, "Grounding failed");
                self.scratch.purge().await;
                self.transport
                    .send(&format!(
                        "Could not prepare documents for that topic: {e}. Please try another topic."
                    ))
                    .await
            }
        }
    }

    /// Cancel any in-flight work and delete the scratch directory.
    pub async fn close(self) {
        self.cancel.cancel();
        self.scratch.purge().await;
        info!(id = %self.id, "Research session closed");
    }
}

/// Spawns a watcher that fires `token` on the first Ctrl-C.
///
/// The watcher holds the signal subscription for its whole life; an
/// interrupt that arrives while the host is busy handling a message still
/// cancels in-flight work.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            token.cancel();
        }
    })
}
