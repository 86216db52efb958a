//! Gemini generateContent chat with client-side history replay
//!
//! The REST API is stateless, so a "session" is the accumulated list of
//! contents posted with every generateContent call. The first content is
//! the grounding turn: one file part per document plus the instruction.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::providers::chat::{ChatProvider, ChatSession};
use crate::types::RemoteFile;

/// Gemini chat provider
pub struct GeminiChat {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "fileUri")]
    file_uri: String,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }

    fn user_text(text: &str) -> Self {
        Self::user(vec![Part::text(text)])
    }

    fn model_text(text: &str) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            file_data: None,
        }
    }

    fn file(file: &RemoteFile) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                mime_type: file.mime_type.clone(),
                file_uri: file.uri.clone(),
            }),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: &'a [Content],
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GeminiChat {
    /// Create a new chat provider
    pub fn new(config: &GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[async_trait]
impl ChatProvider for GeminiChat {
    async fn start_session(
        &self,
        files: &[RemoteFile],
        instruction: &str,
    ) -> Result<Box<dyn ChatSession>> {
        let mut parts: Vec<Part> = files.iter().map(Part::file).collect();
        parts.push(Part::text(instruction));

        tracing::debug!(model = %self.model, documents = files.len(), "Starting grounded chat");

        Ok(Box::new(GeminiChatSession {
            client: self.client.clone(),
            url: self.generate_url(),
            api_key: self.api_key.clone(),
            history: vec![Content::user(parts)],
        }))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1beta/models/{}", self.api_base, self.model);
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
        "gemini"
    }
}

/// A live Gemini chat; every send replays the full history
pub struct GeminiChatSession {
    client: Client,
    url: String,
    api_key: String,
    history: Vec<Content>,
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    async fn send(&mut self, text: &str) -> Result<String> {
        let mut contents = self.history.clone();
        contents.push(Content::user_text(text));

        let request = GenerateRequest {
            contents: &contents,
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Chat(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Chat(format!("Failed to parse Gemini response: {}", e)))?;

        // A candidate may split its answer across several text parts.
        let reply = generated
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::chat("No text in Gemini response"))?;

        // Failed turns never reach the history, so they are not replayed.
        self.history = contents;
        self.history.push(Content::model_text(&reply));

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessingState;
    use httpmock::prelude::*;

    fn remote_file(id: u32) -> RemoteFile {
        RemoteFile {
            name: format!("files/doc{id}"),
            uri: format!("https://files.test/doc{id}"),
            display_name: format!("doc{id}.pdf"),
            mime_type: "application/pdf".to_string(),
            state: ProcessingState::Active,
        }
    }

    fn provider(api_base: String) -> GeminiChat {
        GeminiChat::new(&GeminiConfig {
            api_key: "test-key".to_string(),
            api_base,
            ..GeminiConfig::default()
        })
    }

    fn reply_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": text}]}}
            ]
        })
    }

    #[tokio::test]
    async fn test_first_send_replays_the_grounding_turn() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.0-flash-exp:generateContent")
                .header("x-goog-api-key", "test-key")
                .body_contains("https://files.test/doc1")
                .body_contains("Answer from the documents.")
                .body_contains("What is attention?");
            then.status(200).json_body(reply_body("It weighs tokens."));
        });

        let chat = provider(server.base_url());
        assert_eq!(chat.name(), "gemini");
        let mut session = chat
            .start_session(&[remote_file(1)], "Answer from the documents.")
            .await
            .unwrap();

        let reply = session.send("What is attention?").await.unwrap();
        mock.assert();
        assert_eq!(reply, "It weighs tokens.");
    }

    #[tokio::test]
    async fn test_failed_turns_are_not_replayed() {
        let server = MockServer::start();
        let mut failing = server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(500).body("backend exploded");
        });

        let mut session = GeminiChatSession {
            client: Client::new(),
            url: server.url("/v1beta/models/gemini-2.0-flash-exp:generateContent"),
            api_key: "test-key".to_string(),
            history: vec![Content::user(vec![Part::text("grounding")])],
        };

        let err = session.send("first try").await.unwrap_err();
        assert!(matches!(err, Error::Chat(_)));
        assert_eq!(session.history.len(), 1);

        failing.delete();
        server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(200).json_body(reply_body("ok"));
        });

        let reply = session.send("second try").await.unwrap();
        assert_eq!(reply, "ok");
        // grounding turn, second question, model reply; the failed turn is gone
        assert_eq!(session.history.len(), 3);
        assert!(session.history.iter().all(|content| {
            content
                .parts
                .iter()
                .all(|part| part.text.as_deref() != Some("first try"))
        }));
    }

    #[tokio::test]
    async fn test_replies_extend_the_history() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(200).json_body(reply_body("first answer"));
        });

        let mut session = GeminiChatSession {
            client: Client::new(),
            url: server.url("/v1beta/models/gemini-2.0-flash-exp:generateContent"),
            api_key: "test-key".to_string(),
            history: vec![Content::user(vec![Part::text("grounding")])],
        };

        session.send("first question").await.unwrap();
        assert_eq!(session.history.len(), 3);
        assert_eq!(session.history[2].role, "model");
        assert_eq!(
            session.history[2].parts[0].text.as_deref(),
            Some("first answer")
        );
    }

    #[tokio::test]
    async fn test_multi_part_replies_are_joined() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(200).json_body(serde_json::json!({
                "candidates": [
                    {"content": {"role": "model", "parts": [
                        {"text": "The answer "},
                        {"text": "spans two parts."}
                    ]}}
                ]
            }));
        });

        let chat = provider(server.base_url());
        let mut session = chat
            .start_session(&[remote_file(1)], "instruction")
            .await
            .unwrap();

        let reply = session.send("question").await.unwrap();
        assert_eq!(reply, "The answer spans two parts.");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_a_chat_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path_contains("generateContent");
            then.status(200)
                .json_body(serde_json::json!({"candidates": []}));
        });

        let chat = provider(server.base_url());
        let mut session = chat
            .start_session(&[remote_file(1)], "instruction")
            .await
            .unwrap();

        let err = session.send("question").await.unwrap_err();
        match err {
            Error::Chat(message) => assert!(message.contains("No text")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
