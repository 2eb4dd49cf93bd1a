//! # advokit-report
//!
//! The advokit report engine: paginated PDF case reports and AI
//! case-analysis exports.
//!
//! Documents are produced by a small in-crate PDF writer (standard base
//! fonts, pass-through JPEG/PNG embedding) driven by a millimetre-based
//! layout cursor whose single pagination primitive is a page break before
//! any block that would cross the bottom margin. Asset fetching, file
//! upload, notification, and analytics go through the collaborator
//! traits defined in `advokit-core`.

pub mod analysis;
pub mod case_report;
pub mod cleantext;
pub mod config;
pub mod fetch;
pub mod layout;
pub mod markdown;
pub mod pdf;

// Re-export the exporter surface at crate root
pub use analysis::{export_case_analysis, AnalysisExporter, CaseAnalysis, CaseStrength, Violation};
pub use case_report::{export_case_report, CaseReportExporter};
pub use config::ReportConfig;
pub use fetch::{HttpFileStore, HttpImageFetcher};
pub use layout::PageCursor;
