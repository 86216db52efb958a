//! PDF download with filename sanitization

use futures_util::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::types::PaperRecord;

/// Characters stripped from titles before use as filenames
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip filesystem-hostile characters from an untrusted title.
///
/// Distinct titles can collapse to the same name, in which case a later
/// download overwrites an earlier one. Callers accept that trade-off.
pub fn sanitize_filename(title: &str) -> String {
    title.chars().filter(|c| !FORBIDDEN.contains(c)).collect()
}

/// Download one paper's PDF into `dir`, creating `dir` if absent, and
/// return the local path.
///
/// Only HTTP 200 counts as success. Every fault is reported per document so
/// the caller can exclude the paper and continue with the rest.
pub async fn download_pdf(client: &Client, record: &PaperRecord, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::download(&record.title, format!("cannot create download dir: {e}")))?;

    let filename = format!("{}.pdf", sanitize_filename(&record.title));
    let path = dir.join(filename);

    let response = client
        .get(&record.pdf_url)
        .send()
        .await
        .map_err(|e| Error::download(&record.title, e.to_string()))?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(Error::download(
            &record.title,
            format!("unexpected status {}", response.status()),
        ));
    }

    let mut file = tokio::fs::File::create(&path).await.map_err(|e| {
        Error::download(
            &record.title,
            format!("cannot create '{}': {}", path.display(), e),
        )
    })?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::download(&record.title, e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::download(&record.title, e.to_string()))?;
    }
    file.flush()
        .await
        .map_err(|e| Error::download(&record.title, e.to_string()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use httpmock::prelude::*;

    fn record(title: &str, pdf_url: String) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            summary: "summary".to_string(),
            pdf_url,
            authors: vec!["A. Author".to_string()],
            published: Utc::now(),
        }
    }

    #[test]
    fn test_sanitize_strips_forbidden_characters() {
        assert_eq!(sanitize_filename(r#"A/B\C:D*E?F"G<H>I|J"#), "ABCDEFGHIJ");
    }

    #[test]
    fn test_sanitize_keeps_ordinary_titles_intact() {
        assert_eq!(
            sanitize_filename("Attention Is All You Need"),
            "Attention Is All You Need"
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_filename("data: structures / algorithms?");
        assert_eq!(sanitize_filename(&once), once);
    }

    #[tokio::test]
    async fn test_download_writes_the_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pdf/1");
            then.status(200).body("%PDF-1.4 payload");
        });

        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();
        let path = download_pdf(
            &client,
            &record("Paper: One", server.url("/pdf/1")),
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "Paper One.pdf");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "%PDF-1.4 payload");
    }

    #[tokio::test]
    async fn test_download_creates_a_missing_directory() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pdf/1");
            then.status(200).body("%PDF-1.4");
        });

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("session").join("docs");
        let client = Client::new();
        let path = download_pdf(&client, &record("Paper", server.url("/pdf/1")), &dir)
            .await
            .unwrap();

        assert!(path.starts_with(&dir));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_download_rejects_non_200_responses() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pdf/missing");
            then.status(404);
        });

        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();
        let err = download_pdf(
            &client,
            &record("Gone", server.url("/pdf/missing")),
            dir.path(),
        )
        .await
        .unwrap_err();

        match err {
            Error::Download { title, message } => {
                assert_eq!(title, "Gone");
                assert!(message.contains("404"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_colliding_titles_overwrite_silently() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pdf/x");
            then.status(200).body("first body");
        });
        server.mock(|when, then| {
            when.method(GET).path("/pdf/y");
            then.status(200).body("second body");
        });

        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();

        // both titles sanitize to "AB.pdf"
        let first = download_pdf(&client, &record("A/B", server.url("/pdf/x")), dir.path())
            .await
            .unwrap();
        let second = download_pdf(&client, &record("A:B", server.url("/pdf/y")), dir.path())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second body");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
