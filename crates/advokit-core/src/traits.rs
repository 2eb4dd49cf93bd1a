//! Collaborator traits for advokit abstractions.
//!
//! Storage, notification, analytics, and asset transfer are external to
//! the core; these traits define the seams concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::IncidentId;

// =============================================================================
// ASSET TRANSFER
// =============================================================================

/// A binary asset fetched from the storage collaborator.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    /// Content type as reported by the source, when known. Consumers
    /// sniff the bytes regardless.
    pub content_type: Option<String>,
}

/// Fetches binary assets (evidence photos) by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the asset at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedAsset>;
}

/// Request to persist a generated file through the upload collaborator.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
    /// Category tag the storage layer records on the resulting log row
    /// (e.g. `analysis_pdf`).
    pub category: String,
    pub bytes: Vec<u8>,
}

/// Response from the upload collaborator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
}

/// Persists a binary file and returns its stored URL.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, req: UploadRequest) -> Result<UploadedFile>;
}

// =============================================================================
// CACHE INVALIDATION
// =============================================================================

/// Signals that an incident's log list must be refetched after a new log
/// was created externally.
#[async_trait]
pub trait LogCache: Send + Sync {
    async fn invalidate(&self, incident_id: IncidentId) -> Result<()>;
}

// =============================================================================
// USER NOTIFICATION
// =============================================================================

/// Visual variant of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Info,
    Error,
}

/// Fire-and-forget toast/notification collaborator.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: Option<&str>, variant: ToastVariant);
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Usage analytics collaborator.
#[async_trait]
pub trait Analytics: Send + Sync {
    /// Record a completed PDF export. Failures are the caller's decision
    /// to surface or swallow.
    async fn track_pdf_export(&self) -> Result<()>;
}

// =============================================================================
// REPORT OUTPUT
// =============================================================================

/// Receives a finished document for delivery to the user (download,
/// share sheet, local save).
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<()>;
}
