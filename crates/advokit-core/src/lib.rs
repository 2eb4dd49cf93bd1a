//! # advokit-core
//!
//! Core types, traits, and evidence-organization logic for advokit, the
//! engine of a tenant-advocacy application.
//!
//! This crate holds the domain model (incidents and their evidence logs)
//! and the pure builders that turn a flat per-incident log snapshot into
//! a chronological timeline and categorized file galleries. Rendering,
//! storage, and transport live in sibling crates.

pub mod classify;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod models;
pub mod timeline;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use gallery::{build_file_groups, FileGroup, FileGroupKind, GroupColor, GroupIcon};
pub use models::{
    Incident, IncidentId, IncidentLog, IncidentStatus, LogCategory, LogId, LogMetadata, LogType,
};
pub use timeline::{build_timeline, SortedLogs, TimelineItem};
pub use traits::{
    Analytics, FetchedAsset, FileStore, ImageFetcher, LogCache, Notifier, ReportSink,
    ToastVariant, UploadRequest, UploadedFile,
};
