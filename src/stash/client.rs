// HTTP client for the stash endpoint

use crate::types::{AppError, AppResult, Progress, StashFile};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::{multipart, Body, Client};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct StashClient {
    client: Client,
}

impl StashClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_user_agent(user_agent: &str) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// GET `url` into memory, reporting progress after every received chunk
    pub async fn download<F>(&self, url: &str, mut on_progress: F) -> AppResult<Bytes>
    where
        F: FnMut(Progress),
    {
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Download(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Download(format!("{} returned {}", url, status)));
        }

        let total = response.content_length();
        let mut content = BytesMut::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::Download(format!("reading {} failed: {}", url, e)))?;
            content.extend_from_slice(&chunk);
            on_progress(Progress {
                received: content.len() as u64,
                total,
            });
        }

        debug!("Downloaded {} bytes from {}", content.len(), url);
        Ok(content.freeze())
    }

    /// Submit `files` in one multipart request, one part per file.
    ///
    /// The stash answers with an array of ids in submission order; see
    /// [`parse_stash_ids`] for the accepted shapes.
    pub async fn stash(&self, stash_url: &str, files: Vec<StashFile>) -> AppResult<Vec<String>> {
        if files.is_empty() {
            return Err(AppError::InvalidRequest("no files to stash".to_string()));
        }

        let count = files.len();
        // names go out verbatim, the way browsers write form-data
        let mut form = multipart::Form::new().percent_encode_noop();
        for file in files {
            let mime = file.mime_type();
            let length = file.content.len() as u64;
            let part = multipart::Part::stream_with_length(Body::from(file.content), length)
                .file_name(file.name.clone())
                .mime_str(&mime)
                .map_err(|e| AppError::Upload(format!("invalid MIME type {}: {}", mime, e)))?;
            form = form.part(file.name, part);
        }

        let response = self
            .client
            .post(stash_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("request to {} failed: {}", stash_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!(
                "{} returned {}: {}",
                stash_url, status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upload(format!("reading stash response failed: {}", e)))?;
        let ids = parse_stash_ids(&body)?;

        info!("Stashed {} file(s) at {}", count, stash_url);
        Ok(ids)
    }

    /// GET a previously stashed file.
    ///
    /// The stash may delete a file once it has been read, so this can only be
    /// expected to succeed once per id.
    pub async fn fetch_stashed(&self, url: &str) -> AppResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Download(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Download(format!("{} returned {}", url, status)));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Download(format!("reading {} failed: {}", url, e)))
    }
}

/// Parse the id list a stash sends back after an upload.
///
/// Plain JSON arrays are accepted, and so is the stash's multi-file reply,
/// which writes the quoted ids back to back without commas: `["a""b"]`.
pub fn parse_stash_ids(body: &str) -> AppResult<Vec<String>> {
    let body = body.trim();
    if let Ok(ids) = serde_json::from_str::<Vec<String>>(body) {
        return Ok(ids);
    }

    let inner = body
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| AppError::Upload(format!("stash response is not an array: {}", body)))?;

    serde_json::Deserializer::from_str(inner)
        .into_iter::<String>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Upload(format!("Failed to parse stash response: {}", e)))
}

impl Default for StashClient {
    fn default() -> Self {
        Self::new()
    }
}
