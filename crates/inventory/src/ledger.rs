//! Ledger entry model: assignment, maintenance and status-log records.
//!
//! Field names follow the browser store (camelCase). Records written before
//! the audit log existed use older names and Spanish status values; those are
//! accepted as serde aliases and rewritten in the current vocabulary on save.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use fieldops_core::{ClientId, LogEntryId, parse_calendar_date, parse_timestamp};

/// Operational state of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryStatus {
    #[serde(alias = "Disponible")]
    Available,
    #[serde(alias = "Asignado")]
    Assigned,
    #[serde(alias = "En Taller")]
    InMaintenance,
    #[serde(alias = "Inactivo")]
    Retired,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Available => "Available",
            InventoryStatus::Assigned => "Assigned",
            InventoryStatus::InMaintenance => "InMaintenance",
            InventoryStatus::Retired => "Retired",
        }
    }
}

impl core::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occupancy interval of an item at a subject (client or post).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    #[serde(default, alias = "clientId", skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<ClientId>,
    /// Subject display name at assignment time; not re-synced on rename.
    #[serde(alias = "post")]
    pub subject_label: String,
    #[serde(alias = "operatorName")]
    pub receiving_party_name: String,
    #[serde(alias = "supervisorName")]
    pub issuing_supervisor_name: String,
    /// `dd/mm/yyyy`.
    #[serde(alias = "date")]
    pub start_date: String,
    /// Absent while the assignment is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default, alias = "supervisorSignature")]
    pub issuer_signature: String,
    #[serde(default, alias = "operatorSignature")]
    pub receiver_signature: String,
}

impl AssignmentRecord {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Subject id, treating the empty string legacy records carry as absent.
    pub fn subject(&self) -> Option<&ClientId> {
        self.subject_id
            .as_ref()
            .filter(|id| !id.as_str().trim().is_empty())
    }

    pub fn parsed_start(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.start_date)
    }

    pub fn parsed_end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_calendar_date)
    }

    /// Identity used to recognise the same occupancy in two places:
    /// (start date, receiving party, subject label).
    pub fn same_occupancy(&self, other: &AssignmentRecord) -> bool {
        self.start_date == other.start_date
            && self.receiving_party_name == other.receiving_party_name
            && self.subject_label == other.subject_label
    }
}

/// One workshop dispatch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: String,
    #[serde(alias = "date", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub workshop_name: String,
    pub receiver_name: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default, alias = "photoUrl", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// One immutable audit fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLogEntry {
    pub id: LogEntryId,
    #[serde(alias = "date", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub previous_status: InventoryStatus,
    pub new_status: InventoryStatus,
    #[serde(alias = "changedBy")]
    pub actor: String,
    pub reason: String,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
}
