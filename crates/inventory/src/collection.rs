//! Whole-collection operations on inventory items.
//!
//! Each function maps (old collection, input) to a new collection; storing
//! the result is the caller's job.

use fieldops_core::{DomainError, ItemId, entity::position_of};

use crate::item::InventoryItem;
use crate::lifecycle::{TransitionRequest, transition};

pub fn find_item<'a>(collection: &'a [InventoryItem], id: &ItemId) -> Option<&'a InventoryItem> {
    position_of(collection, id).map(|idx| &collection[idx])
}

/// First item whose serial matches case-insensitively.
pub fn find_by_serial<'a>(collection: &'a [InventoryItem], serial: &str) -> Option<&'a InventoryItem> {
    collection.iter().find(|item| item.has_serial(serial))
}

/// Append a newly registered item.
///
/// Rejects a duplicate id, or a serial already used by another item.
pub fn add_item(
    collection: &[InventoryItem],
    item: InventoryItem,
) -> Result<Vec<InventoryItem>, DomainError> {
    if find_item(collection, item.id_typed()).is_some() {
        return Err(DomainError::conflict(format!(
            "item id {} already exists",
            item.id_typed()
        )));
    }
    if !item.serial_number().is_empty() && find_by_serial(collection, item.serial_number()).is_some() {
        return Err(DomainError::conflict(format!(
            "serial number {} already registered",
            item.serial_number()
        )));
    }

    let mut next = collection.to_vec();
    next.push(item);
    Ok(next)
}

/// Run a lifecycle transition on the item with `id`.
///
/// Returns the new collection and the updated item.
pub fn transition_item(
    collection: &[InventoryItem],
    id: &ItemId,
    request: &TransitionRequest,
) -> Result<(Vec<InventoryItem>, InventoryItem), DomainError> {
    let idx = position_of(collection, id)
        .ok_or_else(|| DomainError::not_found(format!("inventory item {id}")))?;

    let updated = transition(&collection[idx], request)?;
    let mut next = collection.to_vec();
    next[idx] = updated.clone();
    Ok((next, updated))
}

/// Remove an item together with all of its embedded records.
pub fn delete_item(
    collection: &[InventoryItem],
    id: &ItemId,
) -> Result<Vec<InventoryItem>, DomainError> {
    if find_item(collection, id).is_none() {
        return Err(DomainError::not_found(format!("inventory item {id}")));
    }
    Ok(collection
        .iter()
        .filter(|item| item.id_typed() != id)
        .cloned()
        .collect())
}
