// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Storage client for profile images.
//!
//! Uploads use the resumable protocol (start, chunked upload, finalize) so
//! progress can be reported after every chunk. The durable download URL is
//! built from the object's download token.

use crate::error::AppError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const STORAGE_URL: &str = "https://firebasestorage.googleapis.com/v0";
/// Upload chunk size (must be a multiple of 256 KiB).
pub const CHUNK_SIZE: usize = 256 * 1024;

/// Upload progress snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Percentage transferred (0-100).
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        self.bytes_transferred as f64 / self.total_bytes as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_transferred >= self.total_bytes
    }
}

/// Object stored by the in-memory backend.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub download_token: String,
}

#[derive(Clone)]
enum Backend {
    Remote { http: reqwest::Client },
    Memory(Arc<DashMap<String, StoredObject>>),
}

/// Firebase Storage client.
#[derive(Clone)]
pub struct StorageService {
    bucket: String,
    base_url: String,
    backend: Backend,
}

impl StorageService {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            base_url: STORAGE_URL.to_string(),
            backend: Backend::Remote {
                http: reqwest::Client::new(),
            },
        }
    }

    /// Client for a different base URL (Storage emulator).
    pub fn with_base_url(bucket: &str, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::new(bucket)
        }
    }

    /// In-memory storage (tests and local runs). The map is shared with the caller.
    pub fn new_in_memory(bucket: &str) -> (Self, Arc<DashMap<String, StoredObject>>) {
        let objects = Arc::new(DashMap::new());
        (
            Self {
                bucket: bucket.to_string(),
                base_url: STORAGE_URL.to_string(),
                backend: Backend::Memory(objects.clone()),
            },
            objects,
        )
    }

    /// Durable URL for an object with the given download token.
    pub fn download_url(&self, path: &str, token: &str) -> String {
        format!(
            "{}/b/{}/o/{}?alt=media&token={}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path),
            token
        )
    }

    /// Upload `bytes` to `path`, overwriting any existing object.
    ///
    /// `on_progress` is called after every chunk. Returns the download URL.
    pub async fn upload_resumable<F>(
        &self,
        id_token: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        mut on_progress: F,
    ) -> Result<String, AppError>
    where
        F: FnMut(UploadProgress) + Send,
    {
        let total_bytes = bytes.len() as u64;
        on_progress(UploadProgress {
            bytes_transferred: 0,
            total_bytes,
        });

        let token = match &self.backend {
            Backend::Memory(objects) => {
                let mut sent = 0u64;
                for chunk in bytes.chunks(CHUNK_SIZE) {
                    sent += chunk.len() as u64;
                    on_progress(UploadProgress {
                        bytes_transferred: sent,
                        total_bytes,
                    });
                }
                let download_token = uuid::Uuid::new_v4().to_string();
                objects.insert(
                    path.to_string(),
                    StoredObject {
                        bytes: bytes.to_vec(),
                        content_type: content_type.to_string(),
                        download_token: download_token.clone(),
                    },
                );
                download_token
            }
            Backend::Remote { http } => {
                let upload_url = self
                    .start_upload(http, id_token, path, total_bytes, content_type)
                    .await?;
                self.upload_chunks(http, id_token, &upload_url, bytes, &mut on_progress)
                    .await?
            }
        };

        tracing::info!(path, bytes = total_bytes, "Object uploaded");
        Ok(self.download_url(path, &token))
    }

    /// Open a resumable session and return its upload URL.
    async fn start_upload(
        &self,
        http: &reqwest::Client,
        id_token: &str,
        path: &str,
        total_bytes: u64,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/b/{}/o", self.base_url, self.bucket);
        let response = http
            .post(&url)
            .query(&[("name", path)])
            .header("Authorization", format!("Firebase {}", id_token))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", total_bytes.to_string())
            .header("X-Goog-Upload-Header-Content-Type", content_type)
            .json(&serde_json::json!({ "name": path, "contentType": content_type }))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload start failed: {}", e)))?;

        let response = check_response(response).await?;
        response
            .headers()
            .get("X-Goog-Upload-URL")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AppError::Storage("Upload start returned no upload URL".to_string()))
    }

    /// Send all chunks, finalizing with the last one. Returns the download token.
    async fn upload_chunks<F>(
        &self,
        http: &reqwest::Client,
        id_token: &str,
        upload_url: &str,
        bytes: &[u8],
        on_progress: &mut F,
    ) -> Result<String, AppError>
    where
        F: FnMut(UploadProgress) + Send,
    {
        let total_bytes = bytes.len() as u64;
        let mut offset = 0usize;
        let mut metadata: Option<ObjectMetadata> = None;

        // An empty body still needs one finalize call.
        loop {
            let end = (offset + CHUNK_SIZE).min(bytes.len());
            let last = end == bytes.len();
            let command = if last { "upload, finalize" } else { "upload" };

            let response = http
                .post(upload_url)
                .header("Authorization", format!("Firebase {}", id_token))
                .header("X-Goog-Upload-Command", command)
                .header("X-Goog-Upload-Offset", offset.to_string())
                .body(bytes[offset..end].to_vec())
                .send()
                .await
                .map_err(|e| AppError::Storage(format!("Chunk upload failed: {}", e)))?;

            let response = check_response(response).await?;
            offset = end;

            on_progress(UploadProgress {
                bytes_transferred: offset as u64,
                total_bytes,
            });

            if last {
                metadata = Some(
                    response
                        .json()
                        .await
                        .map_err(|e| AppError::Storage(format!("Invalid object metadata: {}", e)))?,
                );
                break;
            }
        }

        metadata
            .and_then(|m| m.download_tokens)
            .and_then(|tokens| tokens.split(',').next().map(str::to_string))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Storage("Uploaded object has no download token".to_string()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    download_tokens: Option<String>,
}

async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Storage(format!("HTTP {}: {}", status, body)))
}
