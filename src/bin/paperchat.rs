//! Interactive research chat over arXiv papers
//!
//! Run with: cargo run --bin paperchat

use std::sync::Arc;

use paperchat::config::AppConfig;
use paperchat::pipeline::GroundingPipeline;
use paperchat::providers::{
    ArxivClient, FileStoreProvider, GeminiChat, GeminiFileStore, SearchProvider,
};
use paperchat::session::{cancel_on_ctrl_c, ResearchSession, StdoutTransport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing; logs go to stderr so they never mix with the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperchat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         Paperchat                         ║
║           Grounded Q&A over the top arXiv papers          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = AppConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Search endpoint: {}", config.search.api_base);
    tracing::info!("  - Papers per topic: {}", config.search.max_results);
    tracing::info!("  - Chat model: {}", config.gemini.model);
    tracing::info!("  - Scratch root: {}", config.download.dir.display());

    let search = Arc::new(ArxivClient::new(&config.search));
    let store = Arc::new(GeminiFileStore::new(&config.gemini));
    let chat = Arc::new(GeminiChat::new(&config.gemini));

    // Check providers
    if !search.health_check().await.unwrap_or(false) {
        tracing::warn!(
            "Provider '{}' not reachable at {}",
            search.name(),
            config.search.api_base
        );
        tracing::warn!("Topic searches will fail until it is");
    }
    if !store.health_check().await.unwrap_or(false) {
        tracing::warn!(
            "Provider '{}' not reachable at {}",
            store.name(),
            config.gemini.api_base
        );
        tracing::warn!("Check GOOGLE_API_KEY and your network access");
    }

    let pipeline = GroundingPipeline::new(&config, search, store, chat);
    let mut session = ResearchSession::new(&config, pipeline, Arc::new(StdoutTransport));
    tracing::info!("  - Session id: {}", session.id());

    // The watcher outlives every message; Ctrl-C lands even while a
    // grounding run is in flight.
    let cancel = session.cancellation_token();
    let _watcher = cancel_on_ctrl_c(cancel.clone());

    println!("Type a topic to begin. Press Ctrl+C to quit.\n");
    session.open().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                session.handle_message(text).await?;
            }
        }
    }

    session.close().await;
    println!("\nGoodbye!");
    Ok(())
}
