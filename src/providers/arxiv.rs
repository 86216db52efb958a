//! arXiv search client over the Atom query API

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::providers::search::SearchProvider;
use crate::types::PaperRecord;

/// arXiv API client
pub struct ArxivClient {
    client: Client,
    api_base: String,
}

#[derive(Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Deserialize)]
struct AtomEntry {
    title: String,
    summary: String,
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Deserialize)]
struct AtomAuthor {
    name: String,
}

#[derive(Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title")]
    title: Option<String>,
}

impl AtomEntry {
    fn into_record(self) -> Result<PaperRecord> {
        let title = collapse_whitespace(&self.title);

        let pdf_url = self
            .links
            .iter()
            .find(|link| link.title.as_deref() == Some("pdf"))
            .map(|link| link.href.clone())
            .ok_or_else(|| Error::Retrieval(format!("entry '{}' has no pdf link", title)))?;

        let published = DateTime::parse_from_rfc3339(&self.published)
            .map_err(|e| {
                Error::Retrieval(format!("bad published date '{}': {}", self.published, e))
            })?
            .with_timezone(&Utc);

        Ok(PaperRecord {
            title,
            summary: collapse_whitespace(&self.summary),
            pdf_url,
            authors: self.authors.into_iter().map(|a| a.name).collect(),
            published,
        })
    }
}

/// Atom wraps long titles and abstracts across indented lines; fold every
/// whitespace run to a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>> {
    let feed: AtomFeed = quick_xml::de::from_str(xml)
        .map_err(|e| Error::Retrieval(format!("Failed to parse arXiv feed: {}", e)))?;

    feed.entries
        .into_iter()
        .map(AtomEntry::into_record)
        .collect()
}

impl ArxivClient {
    /// Create a new arXiv client
    pub fn new(config: &SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for ArxivClient {
    async fn search(&self, topic: &str, max_results: usize) -> Result<Vec<PaperRecord>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::retrieval("topic is empty"));
        }

        let url = format!("{}/query", self.api_base);
        let query = [
            ("search_query", format!("all:{}", topic)),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "relevance".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Retrieval(format!("arXiv request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Retrieval(format!(
                "arXiv returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Retrieval(format!("Failed to read arXiv response: {}", e)))?;

        let records = parse_feed(&body)?;
        if records.is_empty() {
            return Err(Error::Retrieval(format!(
                "no results for topic '{}'",
                topic
            )));
        }

        tracing::debug!(topic, found = records.len(), "arXiv search complete");
        Ok(records)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/query", self.api_base);
        match self
            .client
            .get(&url)
            .query(&[("search_query", "all:electron"), ("max_results", "1")])
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}
