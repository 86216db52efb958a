//! Gemini REST clients for file storage and grounded chat
//!
//! Both clients speak the public Generative Language API, authenticated
//! with an API key header.

pub mod chat;
pub mod files;

pub use chat::GeminiChat;
pub use files::GeminiFileStore;
