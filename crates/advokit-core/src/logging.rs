//! Structured logging field name constants for advokit.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Export failed, user saw a failure toast |
//! | WARN  | Recoverable issue, fallback applied (image placeholder) |
//! | INFO  | Operation completions (report rendered, analysis uploaded) |
//! | DEBUG | Decision points, group/item counts, config choices |
//! | TRACE | Per-log iteration during classification and layout |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Incident being operated on.
pub const INCIDENT_ID: &str = "incident_id";

/// Individual log entry being processed.
pub const LOG_ID: &str = "log_id";

/// Logical operation name.
/// Examples: "build_timeline", "build_file_groups", "export_report"
pub const OPERATION: &str = "op";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of logs in the input snapshot.
pub const LOG_COUNT: &str = "log_count";

/// Number of timeline items produced.
pub const ITEM_COUNT: &str = "item_count";

/// Number of file groups produced.
pub const GROUP_COUNT: &str = "group_count";

/// Number of pages in a rendered document.
pub const PAGE_COUNT: &str = "page_count";

/// Byte length of a rendered document.
pub const DOCUMENT_BYTES: &str = "document_bytes";

// ─── Asset fields ──────────────────────────────────────────────────────────

/// URL of a fetched asset (image or document).
pub const ASSET_URL: &str = "asset_url";

/// Uploaded file URL returned by the storage collaborator.
pub const FILE_URL: &str = "file_url";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
