//! Chronological timeline construction.
//!
//! Collapses consecutive chat turns into grouped units and hides photos
//! that are absorbed as attachments, producing the display-ready sequence
//! the incident view renders.

use tracing::debug;

use crate::models::IncidentLog;

// =============================================================================
// SORTED INPUT CONTRACT
// =============================================================================

/// A slice of logs known to be sorted ascending by `created_at`.
///
/// The timeline builder performs no sorting of its own; this wrapper turns
/// that caller obligation into a type-level precondition. Ties between
/// equal timestamps keep original fetch order (the sort is stable).
#[derive(Debug, Clone, Copy)]
pub struct SortedLogs<'a>(&'a [IncidentLog]);

impl<'a> SortedLogs<'a> {
    /// Sort `logs` in place and wrap them.
    pub fn sort(logs: &'a mut Vec<IncidentLog>) -> Self {
        logs.sort_by_key(|l| l.created_at);
        Self(logs)
    }

    /// Wrap logs the caller guarantees are already sorted.
    pub fn assume_sorted(logs: &'a [IncidentLog]) -> Self {
        debug_assert!(
            logs.windows(2).all(|w| w[0].created_at <= w[1].created_at),
            "SortedLogs::assume_sorted called with unsorted input"
        );
        Self(logs)
    }

    pub fn as_slice(&self) -> &'a [IncidentLog] {
        self.0
    }
}

// =============================================================================
// TIMELINE ITEMS
// =============================================================================

/// One display-ready entry of the incident timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineItem {
    /// A single non-chat log rendered on its own.
    Single(IncidentLog),
    /// A run of consecutive chat turns (user and AI interleaved) rendered
    /// as one conversation block.
    ChatGroup {
        /// Stable per-build key, `chat-group-<n>` with a 0-based counter.
        id: String,
        logs: Vec<IncidentLog>,
    },
}

impl TimelineItem {
    /// Number of underlying logs this item covers.
    pub fn log_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::ChatGroup { logs, .. } => logs.len(),
        }
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Build the timeline for one incident's sorted log snapshot.
///
/// Single left-to-right scan:
/// - photos absorbed as attachments (category tag or parent reference)
///   are skipped entirely; they render in galleries or attachment lists,
/// - consecutive chat logs accumulate into an open run buffer,
/// - any other log flushes the open run as one [`TimelineItem::ChatGroup`]
///   before being emitted as [`TimelineItem::Single`],
/// - a still-open run is flushed at end of input.
///
/// Deterministic and stateless; re-running on the same input yields
/// structurally identical output.
pub fn build_timeline(logs: SortedLogs<'_>) -> Vec<TimelineItem> {
    let mut items = Vec::new();
    let mut chat_run: Vec<IncidentLog> = Vec::new();
    let mut group_index = 0usize;

    for log in logs.as_slice() {
        if log.is_attachment_photo() {
            continue;
        }
        if log.log_type == crate::models::LogType::Chat {
            chat_run.push(log.clone());
            continue;
        }
        flush_chat_run(&mut items, &mut chat_run, &mut group_index);
        items.push(TimelineItem::Single(log.clone()));
    }
    flush_chat_run(&mut items, &mut chat_run, &mut group_index);

    debug!(
        log_count = logs.as_slice().len(),
        item_count = items.len(),
        "built timeline"
    );
    items
}

fn flush_chat_run(
    items: &mut Vec<TimelineItem>,
    chat_run: &mut Vec<IncidentLog>,
    group_index: &mut usize,
) {
    if chat_run.is_empty() {
        return;
    }
    items.push(TimelineItem::ChatGroup {
        id: format!("chat-group-{}", group_index),
        logs: std::mem::take(chat_run),
    });
    *group_index += 1;
}
