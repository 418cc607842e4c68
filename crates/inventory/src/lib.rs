//! Inventory domain module: the equipment lifecycle and assignment ledger.
//!
//! This crate contains business rules for inventory items, implemented purely
//! as deterministic domain logic (no IO, no clock reads, no storage).

pub mod collection;
pub mod history;
pub mod item;
pub mod ledger;
pub mod lifecycle;

pub use collection::{add_item, delete_item, find_by_serial, find_item, transition_item};
pub use history::{AssignmentDuration, HistoryRow, TimelineEntry, history_for, item_timeline};
pub use item::{Intake, InventoryItem, MANUAL_INTAKE_REASON, NewItem};
pub use ledger::{AssignmentRecord, InventoryStatus, MaintenanceRecord, StatusLogEntry};
pub use lifecycle::{
    Actor, AssignPayload, ItemTransitioned, LifecycleAction, MaintenancePayload, RELEASE_REASON,
    RETIRE_REASON, TransitionRequest, transition,
};
