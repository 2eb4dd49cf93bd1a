//! Partition-invariant tests for the file gallery builder.
//!
//! The central guarantee: across all returned groups, every photo- or
//! document-typed log id appears exactly once, and no eligible id is
//! dropped, regardless of how metadata is shaped.

use std::collections::HashSet;

use advokit_core::models::{
    Incident, IncidentId, IncidentLog, IncidentStatus, LogId, LogMetadata, LogType,
};
use advokit_core::{build_file_groups, FileGroupKind};
use chrono::{Duration, TimeZone, Utc};

fn incident() -> Incident {
    Incident {
        id: IncidentId(1),
        title: "Water damage in unit 4B".to_string(),
        description: Some("Recurring leak from the unit above".to_string()),
        status: IncidentStatus::Open,
        created_at: Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap(),
    }
}

fn log(id: i64, log_type: LogType) -> IncidentLog {
    IncidentLog {
        id: LogId(id),
        incident_id: IncidentId(1),
        log_type,
        title: None,
        content: format!("entry {}", id),
        file_url: Some(format!("https://files.example/{}.bin", id)),
        metadata: LogMetadata::default(),
        is_ai: false,
        created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap() + Duration::minutes(id),
    }
}

fn with_meta(mut l: IncidentLog, category: Option<&str>, parent: Option<i64>) -> IncidentLog {
    l.metadata.category = category.map(str::to_string);
    l.metadata.parent_log_id = parent.map(LogId);
    l
}

/// A deliberately messy snapshot exercising every claim stage at once.
fn mixed_snapshot() -> Vec<IncidentLog> {
    let mut titled_photo = log(10, LogType::Photo);
    titled_photo.title = Some("Hallway damage".to_string());
    vec![
        log(1, LogType::Call),
        log(2, LogType::Note),
        with_meta(log(3, LogType::Photo), Some("incident_photo"), None),
        with_meta(log(4, LogType::Photo), None, Some(1)),
        with_meta(log(5, LogType::Document), None, Some(1)),
        with_meta(log(6, LogType::Photo), Some("chat_photo"), None),
        with_meta(log(7, LogType::Document), Some("chat_document"), None),
        with_meta(log(8, LogType::Document), Some("analysis_pdf"), None),
        log(9, LogType::Document),
        titled_photo,
        with_meta(log(11, LogType::Photo), Some("chat_photo"), Some(1)),
        log(12, LogType::Photo),
        log(13, LogType::Chat),
        with_meta(log(14, LogType::Photo), Some("unrecognized_tag"), None),
    ]
}

fn assert_partition(logs: &[IncidentLog], incident: Option<&Incident>) {
    let groups = build_file_groups(logs, incident);

    let eligible: HashSet<LogId> = logs
        .iter()
        .filter(|l| matches!(l.log_type, LogType::Photo | LogType::Document))
        .map(|l| l.id)
        .collect();

    let mut seen: HashSet<LogId> = HashSet::new();
    for group in &groups {
        for file in &group.files {
            assert!(
                seen.insert(file.id),
                "log {} appears in more than one group",
                file.id
            );
        }
    }
    assert_eq!(seen, eligible, "grouped ids must equal eligible ids");
}

#[test]
fn test_partition_property_with_incident_context() {
    let logs = mixed_snapshot();
    assert_partition(&logs, Some(&incident()));
}

#[test]
fn test_partition_property_without_incident_context() {
    let logs = mixed_snapshot();
    assert_partition(&logs, None);
}

#[test]
fn test_partition_property_empty_input() {
    assert_partition(&[], Some(&incident()));
}

#[test]
fn test_partition_property_only_chat_logs() {
    let logs = vec![log(1, LogType::Chat), log(2, LogType::Chat)];
    let groups = build_file_groups(&logs, Some(&incident()));
    assert!(groups.is_empty());
}

#[test]
fn test_group_emission_order_follows_stage_priority() {
    let logs = mixed_snapshot();
    let groups = build_file_groups(&logs, Some(&incident()));
    let kinds: Vec<FileGroupKind> = groups.iter().map(|g| g.kind).collect();

    let position = |kind: FileGroupKind| kinds.iter().position(|k| *k == kind);
    let cover = position(FileGroupKind::IncidentCover).expect("cover group");
    let event = position(FileGroupKind::Event).expect("event group");
    let chat = position(FileGroupKind::ChatFiles).expect("chat group");
    let photos = position(FileGroupKind::Photos).expect("photos group");
    let analysis = position(FileGroupKind::AnalysisReports).expect("analysis group");
    let documents = position(FileGroupKind::Documents).expect("documents group");

    assert!(cover < event);
    assert!(event < chat);
    assert!(chat < photos);
    assert!(photos < analysis);
    assert!(analysis < documents);
}

#[test]
fn test_gallery_priority_parent_claim_beats_chat_tag() {
    // Spec'd priority scenario: both parentLogId -> call and chat_photo tag.
    let logs = vec![
        log(1, LogType::Call),
        with_meta(log(2, LogType::Photo), Some("chat_photo"), Some(1)),
    ];
    let groups = build_file_groups(&logs, None);
    let event = groups
        .iter()
        .find(|g| g.kind == FileGroupKind::Event)
        .expect("event group");
    assert_eq!(event.files[0].id, LogId(2));
    assert!(groups.iter().all(|g| g.kind != FileGroupKind::ChatFiles));
}

#[test]
fn test_scenario_analysis_pdf_routed_to_analysis_group() {
    // An analysis_pdf document with no parent lands in AI Analysis PDFs,
    // never in the plain Documents leftover.
    let logs = vec![with_meta(log(1, LogType::Document), Some("analysis_pdf"), None)];
    let groups = build_file_groups(&logs, Some(&incident()));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, FileGroupKind::AnalysisReports);
    assert_eq!(groups[0].label, "AI Analysis PDFs");
}
