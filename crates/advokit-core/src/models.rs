//! Core data models for advokit.
//!
//! These types are shared across all advokit crates and represent the
//! central domain entities: an incident (one rental dispute case) and its
//! evidence log. Field names serialize in camelCase to match the wire
//! shape of the storage collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

// =============================================================================
// ID TYPES
// =============================================================================

/// Storage-assigned identifier of an incident.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct IncidentId(pub i64);

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage-assigned identifier of a single incident log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct LogId(pub i64);

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// INCIDENT
// =============================================================================

/// Lifecycle status of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    /// Case is active; renders the green status badge.
    #[default]
    Open,
    /// Case resolved to the tenant's satisfaction.
    Resolved,
    /// Case closed without resolution.
    Closed,
}

impl IncidentStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A user-created case record grouping all evidence about one rental
/// dispute. Read-only context for report headers and gallery labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: IncidentId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// LOG TYPE
// =============================================================================

/// The closed set of log entry kinds. Determines rendering and
/// classification branch; immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Call,
    Text,
    Email,
    Service,
    Note,
    Photo,
    Document,
    Chat,
}

impl LogType {
    /// Capitalized human-facing label, used in gallery group names and
    /// report entry tags.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Call => "Call",
            Self::Text => "Text",
            Self::Email => "Email",
            Self::Service => "Service",
            Self::Note => "Note",
            Self::Photo => "Photo",
            Self::Document => "Document",
            Self::Chat => "Chat",
        }
    }
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Text => write!(f, "text"),
            Self::Email => write!(f, "email"),
            Self::Service => write!(f, "service"),
            Self::Note => write!(f, "note"),
            Self::Photo => write!(f, "photo"),
            Self::Document => write!(f, "document"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

// =============================================================================
// LOG CATEGORY
// =============================================================================

/// Recognized values of the `category` metadata key.
///
/// Unrecognized strings are carried through as [`LogCategory::Other`];
/// they are valid (uncategorized) data, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LogCategory {
    /// Photo attached to an AI chat turn.
    ChatPhoto,
    /// Document attached to an AI chat turn.
    ChatDocument,
    /// Cover photo of the incident itself.
    IncidentPhoto,
    /// PDF generated by the AI case-analysis exporter.
    AnalysisPdf,
    /// Photo riding on a call log.
    CallPhoto,
    /// Photo riding on a text-message log.
    TextPhoto,
    /// Photo riding on an email log.
    EmailPhoto,
    /// Photo riding on a service-request log.
    ServicePhoto,
    /// Any other tag; grouped with uncategorized files.
    Other(String),
}

impl LogCategory {
    /// Parse a raw metadata string. Any unknown value becomes `Other`.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "chat_photo" => Self::ChatPhoto,
            "chat_document" => Self::ChatDocument,
            "incident_photo" => Self::IncidentPhoto,
            "analysis_pdf" => Self::AnalysisPdf,
            "call_photo" => Self::CallPhoto,
            "text_photo" => Self::TextPhoto,
            "email_photo" => Self::EmailPhoto,
            "service_photo" => Self::ServicePhoto,
            other => Self::Other(other.to_string()),
        }
    }

    /// The raw wire string for this category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ChatPhoto => "chat_photo",
            Self::ChatDocument => "chat_document",
            Self::IncidentPhoto => "incident_photo",
            Self::AnalysisPdf => "analysis_pdf",
            Self::CallPhoto => "call_photo",
            Self::TextPhoto => "text_photo",
            Self::EmailPhoto => "email_photo",
            Self::ServicePhoto => "service_photo",
            Self::Other(raw) => raw,
        }
    }

    /// The `<type>_photo` category that marks a photo as riding on an
    /// event log of the given type, where one exists.
    pub fn event_photo(parent: LogType) -> Option<Self> {
        match parent {
            LogType::Call => Some(Self::CallPhoto),
            LogType::Text => Some(Self::TextPhoto),
            LogType::Email => Some(Self::EmailPhoto),
            LogType::Service => Some(Self::ServicePhoto),
            _ => None,
        }
    }
}

impl From<String> for LogCategory {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl From<LogCategory> for String {
    fn from(category: LogCategory) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// LOG METADATA
// =============================================================================

/// Typed view of a log's open metadata bag.
///
/// The two recognized keys get typed fields; everything else is preserved
/// verbatim in `extra` so round-tripping a record never loses data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    /// Raw category tag. Empty strings are treated as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Back-reference to the log this file is attached to. Always a log
    /// of the same incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_log_id: Option<LogId>,
    /// Unrecognized keys, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl LogMetadata {
    /// Typed category, if a non-empty tag is present.
    pub fn category(&self) -> Option<LogCategory> {
        self.category
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(LogCategory::from_raw)
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.parent_log_id.is_none() && self.extra.is_empty()
    }
}

// =============================================================================
// INCIDENT LOG
// =============================================================================

/// One atomic evidence/communication/chat entry belonging to an incident.
///
/// Logs are fetched in bulk per incident view and treated as an immutable
/// snapshot by every builder in this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentLog {
    pub id: LogId,
    pub incident_id: IncidentId,
    #[serde(rename = "type")]
    pub log_type: LogType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free text body; may be empty for pure photo/document attachments.
    #[serde(default)]
    pub content: String,
    /// Pointer to a binary asset for photo/document types or attachments
    /// riding on other types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "LogMetadata::is_empty")]
    pub metadata: LogMetadata,
    /// Only meaningful for chat logs: assistant-authored vs user-authored.
    #[serde(default)]
    pub is_ai: bool,
    /// The sole ordering key. Ties keep original fetch order.
    pub created_at: DateTime<Utc>,
}

impl IncidentLog {
    /// Typed metadata category, if present and non-empty.
    pub fn category(&self) -> Option<LogCategory> {
        self.metadata.category()
    }

    pub fn parent_log_id(&self) -> Option<LogId> {
        self.metadata.parent_log_id
    }

    /// A photo carrying any category tag. Such photos render only inside
    /// galleries or attachment lists, never as standalone timeline entries.
    pub fn is_categorized_photo(&self) -> bool {
        self.log_type == LogType::Photo && self.category().is_some()
    }

    /// A photo absorbed as an attachment: it carries a category tag, a
    /// parent reference, or both. Hidden from the timeline.
    pub fn is_attachment_photo(&self) -> bool {
        self.log_type == LogType::Photo
            && (self.category().is_some() || self.parent_log_id().is_some())
    }

    /// Title if set, otherwise the content truncated to `max` characters
    /// with a trailing ellipsis. Used for gallery group labels.
    pub fn display_label(&self, max: usize) -> String {
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => {
                let content = self.content.trim();
                if content.chars().count() > max {
                    let truncated: String = content.chars().take(max).collect();
                    format!("{}...", truncated)
                } else {
                    content.to_string()
                }
            }
        }
    }
}
