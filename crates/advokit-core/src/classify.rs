//! Pure per-log classification helpers.
//!
//! These functions answer "what semantic bucket does this log belong to"
//! without mutating state. They are called redundantly from both the
//! timeline and gallery builders; inputs are bounded by one incident's
//! log count, so repeated scans stay cheap.

use crate::models::{IncidentLog, LogCategory, LogId, LogType};

/// Log types that can carry photo attachments.
const PHOTO_PARENT_TYPES: [LogType; 5] = [
    LogType::Call,
    LogType::Text,
    LogType::Email,
    LogType::Photo,
    LogType::Service,
];

/// Log types that can carry document attachments.
const DOCUMENT_PARENT_TYPES: [LogType; 4] =
    [LogType::Call, LogType::Text, LogType::Email, LogType::Service];

/// Typed category of a log's metadata, if one is present.
///
/// Absent metadata, a missing key, or an empty string all yield `None`.
/// Unknown tags pass through as [`LogCategory::Other`].
pub fn meta_category(log: &IncidentLog) -> Option<LogCategory> {
    log.category()
}

/// True iff this log is an AI-generated case-analysis PDF.
pub fn is_analysis_pdf(log: &IncidentLog) -> bool {
    matches!(meta_category(log), Some(LogCategory::AnalysisPdf))
}

/// All photo logs attached to `log` via the `parentLogId` back-reference.
///
/// Only meaningful for `call|text|email|photo|service` parents; every
/// other type returns an empty list.
pub fn attached_photos<'a>(log: &IncidentLog, all_logs: &'a [IncidentLog]) -> Vec<&'a IncidentLog> {
    attached_of_type(log.id, log.log_type, all_logs, LogType::Photo, &PHOTO_PARENT_TYPES)
}

/// All document logs attached to `log` via the `parentLogId`
/// back-reference. Restricted to `call|text|email|service` parents.
pub fn attached_documents<'a>(
    log: &IncidentLog,
    all_logs: &'a [IncidentLog],
) -> Vec<&'a IncidentLog> {
    attached_of_type(
        log.id,
        log.log_type,
        all_logs,
        LogType::Document,
        &DOCUMENT_PARENT_TYPES,
    )
}

fn attached_of_type<'a>(
    parent_id: LogId,
    parent_type: LogType,
    all_logs: &'a [IncidentLog],
    child_type: LogType,
    allowed_parents: &[LogType],
) -> Vec<&'a IncidentLog> {
    if !allowed_parents.contains(&parent_type) {
        return Vec::new();
    }
    all_logs
        .iter()
        .filter(|l| l.log_type == child_type && l.parent_log_id() == Some(parent_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncidentId, LogMetadata};
    use chrono::{TimeZone, Utc};

    fn log(id: i64, log_type: LogType, parent: Option<i64>) -> IncidentLog {
        IncidentLog {
            id: LogId(id),
            incident_id: IncidentId(1),
            log_type,
            title: None,
            content: String::new(),
            file_url: None,
            metadata: LogMetadata {
                category: None,
                parent_log_id: parent.map(LogId),
                extra: Default::default(),
            },
            is_ai: false,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, id as u32).unwrap(),
        }
    }

    #[test]
    fn test_meta_category_passthrough() {
        let mut l = log(1, LogType::Photo, None);
        assert_eq!(meta_category(&l), None);

        l.metadata.category = Some("chat_photo".to_string());
        assert_eq!(meta_category(&l), Some(LogCategory::ChatPhoto));

        l.metadata.category = Some("unheard_of".to_string());
        assert_eq!(
            meta_category(&l),
            Some(LogCategory::Other("unheard_of".to_string()))
        );
    }

    #[test]
    fn test_is_analysis_pdf() {
        let mut l = log(1, LogType::Document, None);
        assert!(!is_analysis_pdf(&l));
        l.metadata.category = Some("analysis_pdf".to_string());
        assert!(is_analysis_pdf(&l));
    }

    #[test]
    fn test_attached_photos_matches_parent_reference() {
        let call = log(1, LogType::Call, None);
        let all = vec![
            call.clone(),
            log(2, LogType::Photo, Some(1)),
            log(3, LogType::Photo, Some(9)),
            log(4, LogType::Document, Some(1)),
        ];
        let photos = attached_photos(&call, &all);
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].id, LogId(2));
    }

    #[test]
    fn test_attached_photos_ineligible_parent_type() {
        let note = log(1, LogType::Note, None);
        let all = vec![note.clone(), log(2, LogType::Photo, Some(1))];
        assert!(attached_photos(&note, &all).is_empty());

        let chat = log(3, LogType::Chat, None);
        assert!(attached_photos(&chat, &all).is_empty());
    }

    #[test]
    fn test_attached_documents_excludes_photo_parent() {
        // Photos can parent photos but not documents.
        let photo = log(1, LogType::Photo, None);
        let all = vec![photo.clone(), log(2, LogType::Document, Some(1))];
        assert!(attached_documents(&photo, &all).is_empty());

        let email = log(3, LogType::Email, None);
        let all = vec![email.clone(), log(4, LogType::Document, Some(3))];
        let docs = attached_documents(&email, &all);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, LogId(4));
    }

    #[test]
    fn test_classification_is_pure() {
        let call = log(1, LogType::Call, None);
        let all = vec![call.clone(), log(2, LogType::Photo, Some(1))];
        let first: Vec<LogId> = attached_photos(&call, &all).iter().map(|l| l.id).collect();
        let second: Vec<LogId> = attached_photos(&call, &all).iter().map(|l| l.id).collect();
        assert_eq!(first, second);
    }
}
