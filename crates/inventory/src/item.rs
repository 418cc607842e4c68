use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldops_core::{AggregateRoot, DomainError, Entity, ItemId, LogEntryId};

use crate::ledger::{AssignmentRecord, InventoryStatus, MaintenanceRecord, StatusLogEntry};

/// Reason recorded on the synthetic entry of a manually registered item.
pub const MANUAL_INTAKE_REASON: &str = "Initial inventory intake";

/// Aggregate root: one physical, trackable equipment unit.
///
/// The status is a cached projection of `status_log[0].new_status`; both are
/// only ever changed together by `Aggregate::apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    serial_number: String,
    #[serde(default)]
    image_url: String,
    status: InventoryStatus,
    #[serde(default, alias = "assignment", skip_serializing_if = "Option::is_none")]
    active_assignment: Option<AssignmentRecord>,
    /// Most recent first.
    #[serde(default, alias = "history")]
    assignment_history: Vec<AssignmentRecord>,
    /// Most recent first.
    #[serde(default)]
    maintenance_log: Vec<MaintenanceRecord>,
    /// Most recent first; append-only.
    #[serde(default, alias = "statusLogs")]
    status_log: Vec<StatusLogEntry>,
    #[serde(default)]
    version: u64,
}

/// Descriptive fields of an item about to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub serial_number: String,
    pub image_url: String,
}

/// Who registered an item, when, and why. Becomes the intake log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    pub entry_id: LogEntryId,
    pub actor: String,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Create an item in `Available` with a single synthetic intake entry.
    pub fn register(new: NewItem, intake: Intake) -> Result<Self, DomainError> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let entry = StatusLogEntry {
            id: intake.entry_id,
            timestamp: intake.occurred_at,
            previous_status: InventoryStatus::Available,
            new_status: InventoryStatus::Available,
            actor: intake.actor,
            reason: intake.reason,
        };

        Ok(Self {
            id: new.id,
            name: new.name.trim().to_string(),
            description: new.description,
            serial_number: new.serial_number.trim().to_string(),
            image_url: new.image_url,
            status: InventoryStatus::Available,
            active_assignment: None,
            assignment_history: Vec::new(),
            maintenance_log: Vec::new(),
            status_log: vec![entry],
            version: 0,
        })
    }

    pub fn id_typed(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn status(&self) -> InventoryStatus {
        self.status
    }

    pub fn active_assignment(&self) -> Option<&AssignmentRecord> {
        self.active_assignment.as_ref()
    }

    pub fn assignment_history(&self) -> &[AssignmentRecord] {
        &self.assignment_history
    }

    pub fn maintenance_log(&self) -> &[MaintenanceRecord] {
        &self.maintenance_log
    }

    pub fn status_log(&self) -> &[StatusLogEntry] {
        &self.status_log
    }

    /// The assignment currently in force: `active_assignment` while `Assigned`.
    pub fn open_record(&self) -> Option<&AssignmentRecord> {
        if self.status == InventoryStatus::Assigned {
            self.active_assignment.as_ref()
        } else {
            None
        }
    }

    /// Case-insensitive serial comparison used for natural-key matching.
    pub fn has_serial(&self, serial: &str) -> bool {
        self.serial_number.to_lowercase() == serial.trim().to_lowercase()
    }

    /// Verify the ledger invariants.
    ///
    /// - the head of the status log agrees with `status`
    /// - `active_assignment` is present iff `Assigned`
    /// - at most one open record in the history, matching `active_assignment`
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        match self.status_log.first() {
            Some(head) if head.new_status == self.status => {}
            Some(head) => {
                return Err(DomainError::invariant(format!(
                    "status {} disagrees with latest log entry {}",
                    self.status, head.new_status
                )));
            }
            None => return Err(DomainError::invariant("status log is empty")),
        }

        let assigned = self.status == InventoryStatus::Assigned;
        if assigned != self.active_assignment.is_some() {
            return Err(DomainError::invariant(
                "active assignment must be present exactly when assigned",
            ));
        }

        let open: Vec<&AssignmentRecord> = self
            .assignment_history
            .iter()
            .filter(|r| r.is_open())
            .collect();
        if open.len() > 1 {
            return Err(DomainError::invariant("more than one open assignment"));
        }
        if let Some(active) = &self.active_assignment {
            let matches_open = open
                .first()
                .is_some_and(|r| r.same_occupancy(active) && r.subject_id == active.subject_id);
            if !matches_open {
                return Err(DomainError::invariant(
                    "active assignment is not the open history record",
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn open_history_record_mut(&mut self) -> Option<&mut AssignmentRecord> {
        self.assignment_history.iter_mut().find(|r| r.is_open())
    }

    pub(crate) fn open_history_record(&self) -> Option<&AssignmentRecord> {
        self.assignment_history.iter().find(|r| r.is_open())
    }

    pub(crate) fn record_transition(
        &mut self,
        entry: StatusLogEntry,
        opened: Option<AssignmentRecord>,
        maintenance: Option<MaintenanceRecord>,
    ) {
        if let Some(record) = opened {
            self.assignment_history.insert(0, record.clone());
            self.active_assignment = Some(record);
        } else {
            self.active_assignment = None;
        }
        if let Some(record) = maintenance {
            self.maintenance_log.insert(0, record);
        }
        self.status = entry.new_status;
        self.status_log.insert(0, entry);
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
}

impl AggregateRoot for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
