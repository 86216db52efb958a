//! Core data types shared across the pipeline

pub mod paper;
pub mod remote_file;

pub use paper::PaperRecord;
pub use remote_file::{ProcessingState, RemoteFile};
