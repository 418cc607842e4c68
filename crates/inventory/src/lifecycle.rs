//! Lifecycle engine: assign / send-to-maintenance / release / retire.
//!
//! Decisions are pure: the caller supplies the timestamp and the id of the new
//! status-log entry, so the same request against the same item always yields
//! the same result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldops_core::{
    Aggregate, Clock, ClientId, DomainError, IdAllocator, LogEntryId, format_calendar_date,
};

use crate::item::InventoryItem;
use crate::ledger::{AssignmentRecord, InventoryStatus, MaintenanceRecord, StatusLogEntry};

pub const RELEASE_REASON: &str = "Release / return to pool";
pub const RETIRE_REASON: &str = "Administrative retirement";

/// Payload of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignPayload {
    pub subject_id: Option<ClientId>,
    pub subject_label: String,
    pub receiving_party_name: String,
    pub observations: Option<String>,
}

/// Payload of a workshop dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenancePayload {
    pub workshop_name: String,
    pub receiver_name: String,
    pub reason: String,
    pub observations: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleAction {
    Assign(AssignPayload),
    SendToMaintenance(MaintenancePayload),
    Release,
    Retire,
}

impl LifecycleAction {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleAction::Assign(_) => "assign",
            LifecycleAction::SendToMaintenance(_) => "send_to_maintenance",
            LifecycleAction::Release => "release",
            LifecycleAction::Retire => "retire",
        }
    }
}

/// Whoever triggers a transition. Privilege is decided by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub is_privileged: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_privileged: false,
        }
    }

    pub fn privileged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_privileged: true,
        }
    }
}

/// Command: apply one lifecycle action to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub action: LifecycleAction,
    pub actor: Actor,
    pub entry_id: LogEntryId,
    pub occurred_at: DateTime<Utc>,
}

impl TransitionRequest {
    /// Build a request stamped by the injected clock and id source.
    pub fn new<C, I>(action: LifecycleAction, actor: Actor, clock: &C, ids: &mut I) -> Self
    where
        C: Clock + ?Sized,
        I: IdAllocator + ?Sized,
    {
        Self {
            action,
            actor,
            entry_id: LogEntryId::from(ids.new_id()),
            occurred_at: clock.now(),
        }
    }
}

/// Event: ItemTransitioned.
///
/// Carries everything `apply` needs; `apply` never re-derives a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTransitioned {
    pub entry: StatusLogEntry,
    /// End date written on the open assignment, if one is being closed.
    pub closes_open_on: Option<String>,
    pub opens: Option<AssignmentRecord>,
    pub maintenance: Option<MaintenanceRecord>,
}

/// Apply `request` to `item`, returning the updated item.
///
/// On error `item` is unchanged and no partial result exists.
pub fn transition(
    item: &InventoryItem,
    request: &TransitionRequest,
) -> Result<InventoryItem, DomainError> {
    item.execute(request)
}

impl Aggregate for InventoryItem {
    type Command = TransitionRequest;
    type Event = ItemTransitioned;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        if let Some(end_date) = &event.closes_open_on {
            if let Some(open) = self.open_history_record_mut() {
                open.end_date = Some(end_date.clone());
            }
        }
        self.record_transition(
            event.entry.clone(),
            event.opens.clone(),
            event.maintenance.clone(),
        );

        // Deterministic version tracking: +1 per applied event.
        self.bump_version();
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if command.actor.name.trim().is_empty() {
            return Err(DomainError::validation("actor name cannot be empty"));
        }

        let event = match &command.action {
            LifecycleAction::Assign(payload) => self.handle_assign(command, payload)?,
            LifecycleAction::SendToMaintenance(payload) => {
                self.handle_maintenance(command, payload)?
            }
            LifecycleAction::Release => self.handle_release(command)?,
            LifecycleAction::Retire => self.handle_retire(command)?,
        };
        Ok(vec![event])
    }
}

impl InventoryItem {
    fn handle_assign(
        &self,
        cmd: &TransitionRequest,
        payload: &AssignPayload,
    ) -> Result<ItemTransitioned, DomainError> {
        require("subject label", &payload.subject_label)?;
        require("receiving party", &payload.receiving_party_name)?;

        let supervisor = cmd.actor.name.trim().to_string();
        let receiver = payload.receiving_party_name.trim().to_string();
        let label = payload.subject_label.trim().to_string();

        let record = AssignmentRecord {
            subject_id: payload.subject_id.clone(),
            subject_label: label.clone(),
            receiving_party_name: receiver.clone(),
            issuing_supervisor_name: supervisor.clone(),
            start_date: format_calendar_date(cmd.occurred_at.date_naive()),
            end_date: None,
            observations: non_blank(&payload.observations),
            issuer_signature: signature_placeholder(&supervisor),
            receiver_signature: signature_placeholder(&receiver),
        };

        Ok(ItemTransitioned {
            entry: self.log_entry(
                cmd,
                InventoryStatus::Assigned,
                format!("Assignment: {receiver} at {label}"),
            ),
            closes_open_on: self.closing_date(cmd.occurred_at),
            opens: Some(record),
            maintenance: None,
        })
    }

    fn handle_maintenance(
        &self,
        cmd: &TransitionRequest,
        payload: &MaintenancePayload,
    ) -> Result<ItemTransitioned, DomainError> {
        require("workshop name", &payload.workshop_name)?;
        require("receiver name", &payload.receiver_name)?;
        require("reason", &payload.reason)?;

        let workshop = payload.workshop_name.trim().to_string();
        let reason = payload.reason.trim().to_string();

        let record = MaintenanceRecord {
            id: cmd.entry_id.to_string(),
            timestamp: cmd.occurred_at,
            workshop_name: workshop.clone(),
            receiver_name: payload.receiver_name.trim().to_string(),
            reason: reason.clone(),
            observations: non_blank(&payload.observations),
            photo: non_blank(&payload.photo),
        };

        Ok(ItemTransitioned {
            entry: self.log_entry(
                cmd,
                InventoryStatus::InMaintenance,
                format!("Workshop: {reason} ({workshop})"),
            ),
            closes_open_on: self.closing_date(cmd.occurred_at),
            opens: None,
            maintenance: Some(record),
        })
    }

    fn handle_release(&self, cmd: &TransitionRequest) -> Result<ItemTransitioned, DomainError> {
        match self.status() {
            InventoryStatus::Assigned | InventoryStatus::InMaintenance => {}
            from => {
                return Err(DomainError::invalid_transition(
                    from.as_str(),
                    cmd.action.name(),
                ));
            }
        }

        Ok(ItemTransitioned {
            entry: self.log_entry(cmd, InventoryStatus::Available, RELEASE_REASON.to_string()),
            closes_open_on: self.closing_date(cmd.occurred_at),
            opens: None,
            maintenance: None,
        })
    }

    fn handle_retire(&self, cmd: &TransitionRequest) -> Result<ItemTransitioned, DomainError> {
        if !cmd.actor.is_privileged {
            return Err(DomainError::forbidden(format!(
                "{} may not retire equipment",
                cmd.actor.name
            )));
        }

        Ok(ItemTransitioned {
            entry: self.log_entry(cmd, InventoryStatus::Retired, RETIRE_REASON.to_string()),
            closes_open_on: self.closing_date(cmd.occurred_at),
            opens: None,
            maintenance: None,
        })
    }

    fn log_entry(
        &self,
        cmd: &TransitionRequest,
        new_status: InventoryStatus,
        reason: String,
    ) -> StatusLogEntry {
        StatusLogEntry {
            id: cmd.entry_id.clone(),
            timestamp: cmd.occurred_at,
            previous_status: self.status(),
            new_status,
            actor: cmd.actor.name.trim().to_string(),
            reason,
        }
    }

    /// End date for the open assignment, if any.
    ///
    /// Never earlier than the record's own start date.
    fn closing_date(&self, at: DateTime<Utc>) -> Option<String> {
        let open = self.open_history_record()?;
        let today = at.date_naive();
        match open.parsed_start() {
            Some(start) if start > today => Some(open.start_date.clone()),
            _ => Some(format_calendar_date(today)),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn signature_placeholder(name: &str) -> String {
    format!("SIGNED_BY_{name}")
}
