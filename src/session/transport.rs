//! Outbound message transport

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Delivery channel for messages addressed to the user.
///
/// The session never prints directly; everything user-visible goes through
/// this trait so the same session logic serves a terminal today and a socket
/// later.
///
/// Implementations:
/// - `StdoutTransport`: line-oriented terminal output
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Writes messages to standard output, one per line.
pub struct StdoutTransport;

#[async_trait]
impl Transport for StdoutTransport {
    async fn send(&self, text: &str) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            out.write_all(b"\n").await?;
        }
        out.flush().await?;
        Ok(())
    }
}
