//! paperchat: Document-grounded research chat over arXiv papers
//!
//! This crate turns a research topic into a grounded conversation. It finds
//! the most relevant arXiv papers for the topic, downloads their PDFs,
//! uploads them to the Gemini File API, waits for the provider to finish
//! processing them, and then answers questions from the documents through a
//! chat session pinned to those files.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pipeline::GroundingPipeline;
pub use session::{cancel_on_ctrl_c, ResearchSession, ScratchDir, StdoutTransport, Transport};
pub use types::{PaperRecord, ProcessingState, RemoteFile};
