//! Provider abstractions for search, file storage, and grounded chat
//!
//! Trait seams keep the session orchestration independent of arXiv and
//! Gemini wire details.

pub mod arxiv;
pub mod chat;
pub mod file_store;
pub mod gemini;
pub mod search;

pub use arxiv::ArxivClient;
pub use chat::{ChatProvider, ChatSession};
pub use file_store::FileStoreProvider;
pub use gemini::{GeminiChat, GeminiFileStore};
pub use search::SearchProvider;
