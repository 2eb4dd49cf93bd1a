//! Categorized file gallery construction.
//!
//! Partitions an incident's photo and document logs into named, icon-tagged
//! groups. Claiming is strict: five stages run in a fixed priority order
//! over a shared set of already-used ids, so every eligible log lands in
//! exactly one group and later stages never see files an earlier stage
//! claimed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Incident, IncidentLog, LogCategory, LogId, LogType};

/// Maximum characters of log content used in an event group label before
/// truncation with an ellipsis.
const LABEL_CONTENT_CHARS: usize = 30;

// =============================================================================
// GROUP TYPES
// =============================================================================

/// Icon reference rendered next to a group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupIcon {
    Phone,
    Message,
    Mail,
    Wrench,
    Image,
    File,
}

/// Color token for a group's icon and accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Green,
    Purple,
    Orange,
    Slate,
}

/// Which stage of the partition produced a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileGroupKind {
    /// Cover photos of the incident itself.
    IncidentCover,
    /// Files bundled under one event log (call, text, email, service,
    /// note, or a titled photo).
    Event,
    /// Photos and documents attached to AI chat turns.
    ChatFiles,
    /// Leftover photos claimed by no earlier stage.
    Photos,
    /// AI-generated case-analysis PDFs.
    AnalysisReports,
    /// Leftover documents claimed by no earlier stage.
    Documents,
}

/// One named bucket of evidence files.
#[derive(Debug, Clone, PartialEq)]
pub struct FileGroup {
    pub id: String,
    pub label: String,
    pub icon: GroupIcon,
    pub color: GroupColor,
    pub kind: FileGroupKind,
    /// Ordered file list; ordering rules are per-stage.
    pub files: Vec<IncidentLog>,
}

/// Fixed type → (icon, color) table for event groups.
fn event_style(log_type: LogType) -> (GroupIcon, GroupColor) {
    match log_type {
        LogType::Call => (GroupIcon::Phone, GroupColor::Blue),
        LogType::Text => (GroupIcon::Message, GroupColor::Green),
        LogType::Email => (GroupIcon::Mail, GroupColor::Purple),
        LogType::Service => (GroupIcon::Wrench, GroupColor::Orange),
        LogType::Photo => (GroupIcon::Image, GroupColor::Blue),
        LogType::Note => (GroupIcon::File, GroupColor::Slate),
        _ => (GroupIcon::File, GroupColor::Slate),
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Partition an incident's files into display groups.
///
/// Stages, in claim-priority order:
/// 1. incident cover photos (`incident_photo`, requires incident context),
/// 2. per-event bundles (each event log plus its `parentLogId` children),
/// 3. chat attachments (`chat_photo` / `chat_document`),
/// 4. leftover standalone photos,
/// 5. leftover standalone documents, with analysis PDFs split out first.
///
/// Input ordering is not assumed; stages that promise chronological
/// output re-sort internally (stable, so timestamp ties keep fetch order).
pub fn build_file_groups(logs: &[IncidentLog], incident: Option<&Incident>) -> Vec<FileGroup> {
    let mut groups = Vec::new();
    let mut used: HashSet<LogId> = HashSet::new();

    if let Some(group) = claim_incident_cover(logs, incident, &mut used) {
        groups.push(group);
    }
    groups.extend(claim_event_groups(logs, &mut used));
    if let Some(group) = claim_chat_files(logs, &mut used) {
        groups.push(group);
    }
    if let Some(group) = claim_leftover_photos(logs, &mut used) {
        groups.push(group);
    }
    groups.extend(claim_leftover_documents(logs, &mut used));

    debug!(
        log_count = logs.len(),
        group_count = groups.len(),
        "built file groups"
    );
    groups
}

/// Stage 1: all photos tagged `incident_photo`, labeled with the incident
/// title. Skipped entirely when no incident context was supplied.
fn claim_incident_cover(
    logs: &[IncidentLog],
    incident: Option<&Incident>,
    used: &mut HashSet<LogId>,
) -> Option<FileGroup> {
    let incident = incident?;
    let files: Vec<IncidentLog> = logs
        .iter()
        .filter(|l| {
            l.log_type == LogType::Photo && l.category() == Some(LogCategory::IncidentPhoto)
        })
        .cloned()
        .collect();
    if files.is_empty() {
        return None;
    }
    used.extend(files.iter().map(|f| f.id));
    Some(FileGroup {
        id: "incident-cover".to_string(),
        label: incident.title.clone(),
        icon: GroupIcon::Image,
        color: GroupColor::Blue,
        kind: FileGroupKind::IncidentCover,
        files,
    })
}

/// Stage 2: one group per event log with a non-empty file bundle.
///
/// Candidates are event-typed logs plus photos that carry their own title,
/// visited in chronological order. A titled photo contributes itself (when
/// it has a file) ahead of its children.
fn claim_event_groups(logs: &[IncidentLog], used: &mut HashSet<LogId>) -> Vec<FileGroup> {
    let mut candidates: Vec<&IncidentLog> = logs
        .iter()
        .filter(|l| {
            matches!(
                l.log_type,
                LogType::Call | LogType::Text | LogType::Email | LogType::Service | LogType::Note
            ) || (l.log_type == LogType::Photo
                && l.title.as_deref().is_some_and(|t| !t.is_empty()))
        })
        .collect();
    candidates.sort_by_key(|l| l.created_at);

    let mut groups = Vec::new();
    for candidate in candidates {
        if used.contains(&candidate.id) {
            continue;
        }
        let mut files: Vec<IncidentLog> = Vec::new();
        if candidate.log_type == LogType::Photo && candidate.file_url.is_some() {
            files.push(candidate.clone());
        }
        files.extend(
            logs.iter()
                .filter(|l| {
                    l.log_type == LogType::Photo
                        && l.parent_log_id() == Some(candidate.id)
                        && !used.contains(&l.id)
                })
                .cloned(),
        );
        files.extend(
            logs.iter()
                .filter(|l| {
                    l.log_type == LogType::Document
                        && l.parent_log_id() == Some(candidate.id)
                        && !used.contains(&l.id)
                })
                .cloned(),
        );
        if files.is_empty() {
            continue;
        }
        used.extend(files.iter().map(|f| f.id));

        let (icon, color) = event_style(candidate.log_type);
        groups.push(FileGroup {
            id: format!("log-{}", candidate.id),
            label: format!(
                "{}: {}",
                candidate.log_type.label(),
                candidate.display_label(LABEL_CONTENT_CHARS)
            ),
            icon,
            color,
            kind: FileGroupKind::Event,
            files,
        });
    }
    groups
}

/// Stage 3: unclaimed chat attachments, merged and re-sorted
/// chronologically.
fn claim_chat_files(logs: &[IncidentLog], used: &mut HashSet<LogId>) -> Option<FileGroup> {
    let mut files: Vec<IncidentLog> = logs
        .iter()
        .filter(|l| !used.contains(&l.id))
        .filter(|l| match l.log_type {
            LogType::Photo => l.category() == Some(LogCategory::ChatPhoto),
            LogType::Document => l.category() == Some(LogCategory::ChatDocument),
            _ => false,
        })
        .cloned()
        .collect();
    if files.is_empty() {
        return None;
    }
    files.sort_by_key(|l| l.created_at);
    used.extend(files.iter().map(|f| f.id));
    Some(FileGroup {
        id: "chat-files".to_string(),
        label: "Chat Files".to_string(),
        icon: GroupIcon::Message,
        color: GroupColor::Green,
        kind: FileGroupKind::ChatFiles,
        files,
    })
}

/// Stage 4: any photo still unclaimed, original relative order preserved.
fn claim_leftover_photos(logs: &[IncidentLog], used: &mut HashSet<LogId>) -> Option<FileGroup> {
    let files: Vec<IncidentLog> = logs
        .iter()
        .filter(|l| l.log_type == LogType::Photo && !used.contains(&l.id))
        .cloned()
        .collect();
    if files.is_empty() {
        return None;
    }
    used.extend(files.iter().map(|f| f.id));
    Some(FileGroup {
        id: "other-photos".to_string(),
        label: "Other Photos".to_string(),
        icon: GroupIcon::Image,
        color: GroupColor::Blue,
        kind: FileGroupKind::Photos,
        files,
    })
}

/// Stage 5: unclaimed documents, with AI analysis PDFs split into their
/// own group ahead of the plain-document leftover.
fn claim_leftover_documents(logs: &[IncidentLog], used: &mut HashSet<LogId>) -> Vec<FileGroup> {
    let remaining: Vec<&IncidentLog> = logs
        .iter()
        .filter(|l| l.log_type == LogType::Document && !used.contains(&l.id))
        .collect();

    let (analysis, documents): (Vec<&IncidentLog>, Vec<&IncidentLog>) = remaining
        .into_iter()
        .partition(|l| crate::classify::is_analysis_pdf(l));

    let mut groups = Vec::new();
    if !analysis.is_empty() {
        used.extend(analysis.iter().map(|f| f.id));
        groups.push(FileGroup {
            id: "analysis-reports".to_string(),
            label: "AI Analysis PDFs".to_string(),
            icon: GroupIcon::File,
            color: GroupColor::Purple,
            kind: FileGroupKind::AnalysisReports,
            files: analysis.into_iter().cloned().collect(),
        });
    }
    if !documents.is_empty() {
        used.extend(documents.iter().map(|f| f.id));
        groups.push(FileGroup {
            id: "documents".to_string(),
            label: "Documents".to_string(),
            icon: GroupIcon::File,
            color: GroupColor::Slate,
            kind: FileGroupKind::Documents,
            files: documents.into_iter().cloned().collect(),
        });
    }
    groups
}
