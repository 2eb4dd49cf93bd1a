//! HTTP implementations of the asset collaborator traits.

use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use advokit_core::{Error, FetchedAsset, FileStore, ImageFetcher, Result, UploadRequest, UploadedFile};

use crate::config::ReportConfig;

// ---------------------------------------------------------------------------
// Image fetcher
// ---------------------------------------------------------------------------

/// Downloads evidence images over HTTP. `data:` URLs (inline uploads
/// that never hit storage) decode locally without a network round trip.
pub struct HttpImageFetcher {
    client: reqwest::Client,
    timeout: std::time::Duration,
}

impl HttpImageFetcher {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: config.fetch_timeout,
        }
    }

    pub fn with_client(client: reqwest::Client, config: &ReportConfig) -> Self {
        Self {
            client,
            timeout: config.fetch_timeout,
        }
    }

    fn decode_data_url(url: &str) -> Result<FetchedAsset> {
        let rest = &url["data:".len()..];
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::Image("malformed data URL".to_string()))?;
        let content_type = meta
            .split(';')
            .next()
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let bytes = if meta.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| Error::Image(format!("data URL decode failed: {}", e)))?
        } else {
            payload.as_bytes().to_vec()
        };
        Ok(FetchedAsset {
            bytes,
            content_type,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedAsset> {
        if url.starts_with("data:") {
            return Self::decode_data_url(url);
        }

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Request(format!("image fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "image fetch returned {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Request(format!("image body read failed: {}", e)))?
            .to_vec();

        debug!(asset_bytes = bytes.len(), "fetched evidence image");
        Ok(FetchedAsset {
            bytes,
            content_type,
        })
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Uploads generated documents to the storage collaborator as a
/// multipart POST with the category as a query tag, mirroring the
/// application's upload endpoint.
pub struct HttpFileStore {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpFileStore {
    pub fn new(upload_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url,
        }
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(&self, req: UploadRequest) -> Result<UploadedFile> {
        let part = reqwest::multipart::Part::bytes(req.bytes)
            .file_name(req.filename.clone())
            .mime_str(&req.content_type)
            .map_err(|e| Error::Upload(format!("invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .query(&[("category", req.category.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload(format!("upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upload(format!(
                "upload returned {}: {}",
                status, body
            )));
        }

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| Error::Upload(format!("upload response parse failed: {}", e)))?;
        debug!(file_url = %uploaded.file_url, "uploaded generated document");
        Ok(uploaded)
    }
}
