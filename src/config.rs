//! Configuration for the research chat system

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Paper search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Document download configuration
    #[serde(default)]
    pub download: DownloadConfig,
    /// Provider ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Chat session configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Default configuration with the Gemini credential taken from the
    /// `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| Error::Config("GOOGLE_API_KEY is not set".to_string()))?;

        let mut config = Self::default();
        config.gemini.api_key = api_key;
        Ok(config)
    }
}

/// Paper search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search API base URL
    #[serde(default = "default_search_api_base")]
    pub api_base: String,
    /// How many papers to ground a session on
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Request timeout in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_search_api_base() -> String {
    "https://export.arxiv.org/api".to_string()
}

fn default_max_results() -> usize {
    3
}

fn default_search_timeout() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: default_search_api_base(),
            max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
        }
    }
}

/// Document download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Scratch root; each session gets its own subdirectory
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,
    /// Timeout for one PDF download in seconds
    #[serde(default = "default_download_timeout")]
    pub timeout_secs: u64,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_download_timeout() -> u64 {
    60
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
            timeout_secs: default_download_timeout(),
        }
    }
}

/// Provider ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Seconds between processing-state polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Deadline for the whole batch to become active, in seconds
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_max_wait() -> u64 {
    600 // 10 minutes
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_wait_secs: default_max_wait(),
        }
    }
}

/// Gemini API configuration, shared by the file store and the chat client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; never logged
    #[serde(default)]
    pub api_key: String,
    /// REST endpoint base
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Generation model (default: "gemini-2.0-flash-exp")
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_gemini_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Instruction pinned to the first turn of every grounded session
    #[serde(default = "default_grounding_instruction")]
    pub grounding_instruction: String,
}

fn default_grounding_instruction() -> String {
    "You have knowledge in these documents. You will answer questions based on \
     these documents. You will ALWAYS search in ALL documents provided and you \
     will answer as accurately as possible."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            grounding_instruction: default_grounding_instruction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_service_contract() {
        let config = AppConfig::default();
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.download.timeout_secs, 60);
        assert_eq!(config.ingest.poll_interval_secs, 10);
        assert_eq!(config.ingest.max_wait_secs, 600);
        assert_eq!(config.gemini.model, "gemini-2.0-flash-exp");
        assert!(config
            .chat
            .grounding_instruction
            .contains("answer questions based on these documents"));
    }

    #[test]
    fn test_from_env_requires_the_api_key() {
        std::env::remove_var("GOOGLE_API_KEY");
        assert!(matches!(AppConfig::from_env(), Err(Error::Config(_))));

        std::env::set_var("GOOGLE_API_KEY", "test-key");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.gemini.api_key, "test-key");
        std::env::remove_var("GOOGLE_API_KEY");
    }

    #[test]
    fn test_partial_config_files_fill_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"gemini": {"api_key": "k", "model": "gemini-1.5-pro"}}"#)
                .unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.api_base, default_api_base());
        assert_eq!(config.search.max_results, 3);
    }
}
