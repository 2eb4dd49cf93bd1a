//! End-to-end scenarios exercising the timeline and gallery builders
//! together over one shared snapshot.

use advokit_core::models::{
    Incident, IncidentId, IncidentLog, IncidentStatus, LogId, LogMetadata, LogType,
};
use advokit_core::{build_file_groups, build_timeline, FileGroupKind, SortedLogs, TimelineItem};
use chrono::{Duration, TimeZone, Utc};

fn incident() -> Incident {
    Incident {
        id: IncidentId(1),
        title: "No heat since January".to_string(),
        description: None,
        status: IncidentStatus::Open,
        created_at: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
    }
}

fn log(id: i64, log_type: LogType, offset_secs: i64) -> IncidentLog {
    IncidentLog {
        id: LogId(id),
        incident_id: IncidentId(1),
        log_type,
        title: None,
        content: format!("entry {}", id),
        file_url: Some(format!("https://files.example/{}.bin", id)),
        metadata: LogMetadata::default(),
        is_ai: false,
        created_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
            + Duration::seconds(offset_secs),
    }
}

#[test]
fn test_scenario_call_with_attachment_and_chat() {
    // call@t1, photo@t1+1min (parent=call), chat(user)@t2, chat(ai)@t2+1s
    let mut call = log(1, LogType::Call, 0);
    call.content = "Called PM".to_string();
    let mut photo = log(2, LogType::Photo, 60);
    photo.metadata.parent_log_id = Some(LogId(1));
    let user_chat = log(3, LogType::Chat, 3600);
    let mut ai_chat = log(4, LogType::Chat, 3601);
    ai_chat.is_ai = true;

    let mut logs = vec![call, photo, user_chat, ai_chat];
    let sorted = SortedLogs::sort(&mut logs);
    let items = build_timeline(sorted);

    // The attached photo never surfaces as its own timeline entry.
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], TimelineItem::Single(l) if l.id == LogId(1)));
    match &items[1] {
        TimelineItem::ChatGroup { id, logs } => {
            assert_eq!(id, "chat-group-0");
            assert_eq!(logs.len(), 2);
            assert!(!logs[0].is_ai);
            assert!(logs[1].is_ai);
        }
        other => panic!("expected chat group, got {:?}", other),
    }

    let groups = build_file_groups(&logs, Some(&incident()));
    assert_eq!(groups.len(), 1);
    let event = &groups[0];
    assert_eq!(event.kind, FileGroupKind::Event);
    assert_eq!(event.id, "log-1");
    assert_eq!(event.label, "Call: Called PM");
    assert_eq!(event.files.len(), 1);
    assert_eq!(event.files[0].id, LogId(2));
}

#[test]
fn test_timeline_coverage_every_non_attachment_log_appears_once() {
    let mut attachment = log(3, LogType::Photo, 30);
    attachment.metadata.category = Some("call_photo".to_string());
    attachment.metadata.parent_log_id = Some(LogId(1));

    let logs = vec![
        log(1, LogType::Call, 0),
        log(2, LogType::Chat, 10),
        attachment,
        log(4, LogType::Chat, 40),
        log(5, LogType::Note, 50),
        log(6, LogType::Document, 60),
    ];
    let items = build_timeline(SortedLogs::assume_sorted(&logs));

    let mut covered: Vec<LogId> = Vec::new();
    for item in &items {
        match item {
            TimelineItem::Single(l) => covered.push(l.id),
            TimelineItem::ChatGroup { logs, .. } => covered.extend(logs.iter().map(|l| l.id)),
        }
    }
    covered.sort();
    // Everything except the attachment photo, each exactly once.
    assert_eq!(
        covered,
        vec![LogId(1), LogId(2), LogId(4), LogId(5), LogId(6)]
    );
}

#[test]
fn test_chat_grouping_determinism() {
    // [note, chat(user), chat(ai), chat(user), note] -> single, group(3), single
    let mut ai = log(3, LogType::Chat, 20);
    ai.is_ai = true;
    let logs = vec![
        log(1, LogType::Note, 0),
        log(2, LogType::Chat, 10),
        ai,
        log(4, LogType::Chat, 30),
        log(5, LogType::Note, 40),
    ];
    let items = build_timeline(SortedLogs::assume_sorted(&logs));
    assert_eq!(items.len(), 3);
    assert!(matches!(&items[0], TimelineItem::Single(l) if l.log_type == LogType::Note));
    assert!(matches!(&items[1], TimelineItem::ChatGroup { logs, .. } if logs.len() == 3));
    assert!(matches!(&items[2], TimelineItem::Single(l) if l.id == LogId(5)));
}

#[test]
fn test_builders_share_snapshot_without_interference() {
    // Both builders may run per render with no ordering dependency.
    let mut photo = log(2, LogType::Photo, 60);
    photo.metadata.parent_log_id = Some(LogId(1));
    let logs = vec![log(1, LogType::Service, 0), photo, log(3, LogType::Chat, 120)];

    let timeline_first = build_timeline(SortedLogs::assume_sorted(&logs));
    let groups_first = build_file_groups(&logs, Some(&incident()));
    let groups_second = build_file_groups(&logs, Some(&incident()));
    let timeline_second = build_timeline(SortedLogs::assume_sorted(&logs));

    assert_eq!(timeline_first, timeline_second);
    assert_eq!(groups_first, groups_second);
}
