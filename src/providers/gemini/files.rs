//! Gemini File API client: resumable upload and processing-state polls

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::providers::file_store::FileStoreProvider;
use crate::types::{ProcessingState, RemoteFile};

/// Gemini File API client
pub struct GeminiFileStore {
    client: Client,
    api_base: String,
    api_key: String,
}

#[derive(Serialize)]
struct StartUploadRequest<'a> {
    file: FileMetadata<'a>,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    #[serde(rename = "displayName")]
    display_name: &'a str,
}

#[derive(Deserialize)]
struct FileEnvelope {
    file: FileResource,
}

#[derive(Deserialize)]
struct FileResource {
    name: String,
    uri: String,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    state: String,
}

#[derive(Deserialize)]
struct FileStateResource {
    state: String,
}

impl GeminiFileStore {
    /// Create a new File API client
    pub fn new(config: &GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn map_state(wire: &str) -> ProcessingState {
        match wire {
            "ACTIVE" => ProcessingState::Active,
            "FAILED" => ProcessingState::Failed,
            // PROCESSING and STATE_UNSPECIFIED both mean "keep waiting"
            _ => ProcessingState::Pending,
        }
    }
}

#[async_trait]
impl FileStoreProvider for GeminiFileStore {
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<RemoteFile> {
        let display_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Ingestion(format!("failed to read '{}': {}", path.display(), e)))?;

        // Resumable protocol: a metadata-only start request returns the URL
        // that accepts the payload bytes in the X-Goog-Upload-URL header.
        let start_url = format!("{}/upload/v1beta/files", self.api_base);
        let start = self
            .client
            .post(&start_url)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header(
                "X-Goog-Upload-Header-Content-Length",
                data.len().to_string(),
            )
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&StartUploadRequest {
                file: FileMetadata {
                    display_name: &display_name,
                },
            })
            .send()
            .await
            .map_err(|e| Error::Ingestion(format!("upload start failed: {}", e)))?;

        if !start.status().is_success() {
            let status = start.status();
            let body = start.text().await.unwrap_or_default();
            return Err(Error::Ingestion(format!(
                "upload start failed ({}): {}",
                status, body
            )));
        }

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::ingestion("upload start response missing X-Goog-Upload-URL"))?;

        let finalize = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(data)
            .send()
            .await
            .map_err(|e| Error::Ingestion(format!("upload failed: {}", e)))?;

        if !finalize.status().is_success() {
            let status = finalize.status();
            let body = finalize.text().await.unwrap_or_default();
            return Err(Error::Ingestion(format!(
                "upload failed ({}): {}",
                status, body
            )));
        }

        let envelope: FileEnvelope = finalize
            .json()
            .await
            .map_err(|e| Error::Ingestion(format!("failed to parse upload response: {}", e)))?;

        let file = envelope.file;
        Ok(RemoteFile {
            state: Self::map_state(&file.state),
            name: file.name,
            uri: file.uri,
            display_name: file.display_name.unwrap_or(display_name),
            mime_type: file.mime_type.unwrap_or_else(|| mime_type.to_string()),
        })
    }

    async fn get_state(&self, name: &str) -> Result<ProcessingState> {
        let url = format!("{}/v1beta/{}", self.api_base, name);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Ingestion(format!("file status request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Ingestion(format!(
                "file status request returned {}",
                response.status()
            )));
        }

        let resource: FileStateResource = response
            .json()
            .await
            .map_err(|e| Error::Ingestion(format!("failed to parse file status: {}", e)))?;

        Ok(Self::map_state(&resource.state))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1beta/files", self.api_base);
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "gemini-files"
    }
}
