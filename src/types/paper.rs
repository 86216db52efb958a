//! Search result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One paper returned by the search provider
///
/// Records are immutable snapshots of a single retrieval call, ordered by
/// the service's relevance ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Title as reported by the search service
    pub title: String,
    /// Abstract text
    pub summary: String,
    /// Direct URL of the PDF payload
    pub pdf_url: String,
    /// Author display names, in listing order
    pub authors: Vec<String>,
    /// Publication timestamp
    pub published: DateTime<Utc>,
}
