//! Subject-scoped equipment history and per-item timelines.
//!
//! `history_for` reconciles each item's open assignment with its closed
//! history so a client's view lists every occupancy exactly once.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use fieldops_core::{ItemId, days_between, parse_calendar_date};

use crate::item::InventoryItem;
use crate::ledger::{AssignmentRecord, MaintenanceRecord, StatusLogEntry};

/// How long an assignment lasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "camelCase")]
pub enum AssignmentDuration {
    /// No end date yet.
    InProgress,
    /// Whole calendar days between start and end.
    Days(i64),
    /// Start or end date could not be parsed.
    Unknown,
}

impl AssignmentDuration {
    pub fn of(record: &AssignmentRecord) -> Self {
        let Some(end) = record.end_date.as_deref() else {
            return AssignmentDuration::InProgress;
        };
        match (record.parsed_start(), parse_calendar_date(end)) {
            (Some(start), Some(end)) => AssignmentDuration::Days(days_between(start, end)),
            _ => AssignmentDuration::Unknown,
        }
    }
}

impl core::fmt::Display for AssignmentDuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AssignmentDuration::InProgress => f.write_str("in progress"),
            AssignmentDuration::Days(1) => f.write_str("1 day"),
            AssignmentDuration::Days(n) => write!(f, "{n} days"),
            AssignmentDuration::Unknown => f.write_str("unknown"),
        }
    }
}

/// One row of a subject's equipment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub item_id: ItemId,
    pub item_name: String,
    pub serial_number: String,
    pub record: AssignmentRecord,
    pub is_current: bool,
    pub duration: AssignmentDuration,
}

impl HistoryRow {
    fn new(item: &InventoryItem, record: &AssignmentRecord, is_current: bool) -> Self {
        Self {
            item_id: item.id_typed().clone(),
            item_name: item.name().to_string(),
            serial_number: item.serial_number().to_string(),
            record: record.clone(),
            is_current,
            duration: AssignmentDuration::of(record),
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.record.parsed_start()
    }
}

/// Equipment history of one subject across the whole inventory.
///
/// A record belongs to the subject when its subject id equals `subject_id`,
/// or, for legacy records without a subject id, when its label equals
/// `subject_label`. History entries identical to an item's open assignment
/// are dropped before matching so the open one only shows up once, as the
/// current row. Rows are sorted by start date, newest first; rows whose start
/// date cannot be parsed come last in their original order.
pub fn history_for(
    subject_id: &str,
    subject_label: &str,
    inventory: &[InventoryItem],
) -> Vec<HistoryRow> {
    let belongs = |record: &AssignmentRecord| match record.subject() {
        Some(id) => id.as_str() == subject_id,
        None => !subject_label.is_empty() && record.subject_label == subject_label,
    };

    let mut rows = Vec::new();
    for item in inventory {
        let open = item.open_record();

        if let Some(open) = open.filter(|r| belongs(*r)) {
            rows.push(HistoryRow::new(item, open, true));
        }

        rows.extend(
            item.assignment_history()
                .iter()
                .filter(|record| !open.is_some_and(|o| o.same_occupancy(*record)))
                .filter(|record| belongs(*record))
                .map(|record| HistoryRow::new(item, record, false)),
        );
    }

    rows.sort_by(|a, b| newest_first(a.start(), b.start()));
    rows
}

fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One entry of an item's own timeline.
///
/// Items recorded before the status log existed only have the legacy
/// assignment and maintenance arrays; both shapes surface through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum TimelineEntry {
    Status(StatusLogEntry),
    LegacyAssignment(AssignmentRecord),
    LegacyMaintenance(MaintenanceRecord),
}

impl TimelineEntry {
    /// Sort key: calendar day of the entry, if known.
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            TimelineEntry::Status(e) => Some(e.timestamp.date_naive()),
            TimelineEntry::LegacyAssignment(r) => r.parsed_start(),
            TimelineEntry::LegacyMaintenance(m) => Some(m.timestamp.date_naive()),
        }
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            TimelineEntry::Status(e) => Some(e.timestamp),
            TimelineEntry::LegacyAssignment(r) => r
                .parsed_start()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc()),
            TimelineEntry::LegacyMaintenance(m) => Some(m.timestamp),
        }
    }
}

/// Newest-first timeline of one item.
///
/// The status log is authoritative; the legacy arrays are consulted only when
/// it is empty.
pub fn item_timeline(item: &InventoryItem) -> Vec<TimelineEntry> {
    if !item.status_log().is_empty() {
        return item
            .status_log()
            .iter()
            .cloned()
            .map(TimelineEntry::Status)
            .collect();
    }

    let mut entries: Vec<TimelineEntry> = item
        .assignment_history()
        .iter()
        .cloned()
        .map(TimelineEntry::LegacyAssignment)
        .chain(
            item.maintenance_log()
                .iter()
                .cloned()
                .map(TimelineEntry::LegacyMaintenance),
        )
        .collect();
    entries.sort_by(|a, b| match (a.instant(), b.instant()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    entries
}
