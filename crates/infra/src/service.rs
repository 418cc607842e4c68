//! Read-modify-write orchestration over the store adapter.
//!
//! Every operation reads the whole collection, runs a pure domain function on
//! it and writes the whole result back. There is no locking between the read
//! and the write: the service assumes it is the only writer of its store.

use std::collections::HashSet;

use serde::Serialize;

use fieldops_clients::{Client, add_client, delete_client, find_client, initials, pick_color, update_client};
use fieldops_core::{
    AggregateRoot, ClientId, Clock, DomainError, IdAllocator, ItemId, LogEntryId, RandomSource,
    fresh_id,
};
use fieldops_ingest::{IngestReport, import_clients, import_inventory};
use fieldops_inventory::{
    Actor, HistoryRow, Intake, InventoryItem, LifecycleAction, MANUAL_INTAKE_REASON, NewItem,
    TimelineEntry, TransitionRequest, add_item, delete_item, find_item, history_for,
    item_timeline, transition_item,
};

use crate::collection::{CLIENTS, INVENTORY};
use crate::config::LedgerConfig;
use crate::error::ServiceError;
use crate::store::KeyValueStore;

/// Descriptive fields of an item registered by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub serial_number: String,
    pub image_url: String,
}

/// Counters of one bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl<E> From<&IngestReport<E>> for ImportSummary {
    fn from(report: &IngestReport<E>) -> Self {
        Self {
            created: report.created,
            updated: report.updated,
            skipped: report.skipped,
        }
    }
}

/// Application service for the equipment ledger.
///
/// Clock, id source and randomness are injected so every operation is
/// reproducible under test.
#[derive(Debug)]
pub struct LedgerService<S, C, I, R> {
    store: S,
    clock: C,
    ids: I,
    rng: R,
    config: LedgerConfig,
}

impl<S, C, I, R> LedgerService<S, C, I, R>
where
    S: KeyValueStore,
    C: Clock,
    I: IdAllocator,
    R: RandomSource,
{
    pub fn new(store: S, clock: C, ids: I, rng: R, config: LedgerConfig) -> Self {
        Self {
            store,
            clock,
            ids,
            rng,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_items(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(INVENTORY.get_all(&self.store)?)
    }

    pub fn list_clients(&self) -> Result<Vec<Client>, ServiceError> {
        Ok(CLIENTS.get_all(&self.store)?)
    }

    pub fn get_item(&self, id: &ItemId) -> Result<InventoryItem, ServiceError> {
        let inventory = self.list_items()?;
        find_item(&inventory, id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("inventory item {id}")).into())
    }

    /// Register one item by hand, in `Available`.
    pub fn register_item(&mut self, draft: ItemDraft, actor: &str) -> Result<InventoryItem, ServiceError> {
        let inventory = self.list_items()?;

        let mut taken: HashSet<String> = inventory.iter().map(|i| i.id_typed().to_string()).collect();
        let id = fresh_id(&mut self.ids, &mut taken);
        let item = InventoryItem::register(
            NewItem {
                id: ItemId::from(id),
                name: draft.name,
                description: draft.description,
                serial_number: draft.serial_number,
                image_url: draft.image_url,
            },
            Intake {
                entry_id: LogEntryId::from(self.ids.new_id()),
                actor: actor.to_string(),
                reason: MANUAL_INTAKE_REASON.to_string(),
                occurred_at: self.clock.now(),
            },
        )?;

        let next = add_item(&inventory, item.clone())?;
        INVENTORY.set_all(&self.store, &next)?;

        tracing::info!(item_id = %item.id_typed(), serial = item.serial_number(), "item registered");
        Ok(item)
    }

    /// Apply one lifecycle action and persist the result.
    pub fn transition_item(
        &mut self,
        id: &ItemId,
        action: LifecycleAction,
        actor: Actor,
    ) -> Result<InventoryItem, ServiceError> {
        let inventory = self.list_items()?;
        let action_name = action.name();
        let request = TransitionRequest::new(action, actor, &self.clock, &mut self.ids);

        let (next, item) = match transition_item(&inventory, id, &request) {
            Ok(done) => done,
            Err(err) => {
                tracing::warn!(item_id = %id, action = action_name, error = %err, "transition refused");
                return Err(err.into());
            }
        };
        INVENTORY.set_all(&self.store, &next)?;

        tracing::info!(
            item_id = %id,
            action = action_name,
            status = item.status().as_str(),
            version = item.version(),
            "item transitioned"
        );
        Ok(item)
    }

    pub fn delete_item(&self, id: &ItemId) -> Result<(), ServiceError> {
        let inventory = self.list_items()?;
        let next = delete_item(&inventory, id)?;
        INVENTORY.set_all(&self.store, &next)?;
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }

    /// Bulk-load inventory from delimited text. Existing serials are skipped.
    pub fn import_inventory_csv(&mut self, text: &str) -> Result<ImportSummary, ServiceError> {
        let inventory = self.list_items()?;
        let settings = self.config.inventory_import();
        let report = import_inventory(&inventory, text, &self.clock, &mut self.ids, settings)?;
        INVENTORY.set_all(&self.store, &report.collection)?;

        let summary = ImportSummary::from(&report);
        tracing::info!(created = summary.created, skipped = summary.skipped, "inventory import stored");
        Ok(summary)
    }

    /// Bulk-upsert clients from delimited text.
    pub fn import_clients_csv(&mut self, text: &str) -> Result<ImportSummary, ServiceError> {
        let clients = self.list_clients()?;
        let report = import_clients(&clients, text, &mut self.rng, &self.config.client_id_prefix)?;
        CLIENTS.set_all(&self.store, &report.collection)?;

        let summary = ImportSummary::from(&report);
        tracing::info!(created = summary.created, updated = summary.updated, "client import stored");
        Ok(summary)
    }

    /// Add a client. A blank or taken id is replaced by the next sequential one;
    /// missing initials and colour are filled in.
    pub fn add_client(&mut self, mut client: Client) -> Result<Client, ServiceError> {
        let clients = self.list_clients()?;
        if client.initials.trim().is_empty() {
            client.initials = initials(&client.name);
        }
        if client.color_class.trim().is_empty() {
            client.color_class = pick_color(&mut self.rng);
        }

        let (next, id) = add_client(&clients, client, &self.config.client_id_prefix)?;
        CLIENTS.set_all(&self.store, &next)?;

        tracing::info!(client_id = %id, "client added");
        find_client(&next, &id)
            .cloned()
            .ok_or_else(|| DomainError::invariant(format!("client {id} missing after insert")).into())
    }

    pub fn update_client(&self, client: Client) -> Result<(), ServiceError> {
        let clients = self.list_clients()?;
        let id = client.id.clone();
        let next = update_client(&clients, client)?;
        CLIENTS.set_all(&self.store, &next)?;
        tracing::info!(client_id = %id, "client updated");
        Ok(())
    }

    /// Remove a client. Assignment records naming it keep their label.
    pub fn delete_client(&self, id: &ClientId) -> Result<(), ServiceError> {
        let clients = self.list_clients()?;
        let next = delete_client(&clients, id)?;
        CLIENTS.set_all(&self.store, &next)?;
        tracing::info!(client_id = %id, "client deleted");
        Ok(())
    }

    /// Every occupancy of any item by the client, newest first.
    pub fn client_history(&self, id: &ClientId) -> Result<Vec<HistoryRow>, ServiceError> {
        let clients = self.list_clients()?;
        let client = find_client(&clients, id)
            .ok_or_else(|| DomainError::not_found(format!("client {id}")))?;
        let inventory = self.list_items()?;
        Ok(history_for(id.as_str(), &client.name, &inventory))
    }

    pub fn item_timeline(&self, id: &ItemId) -> Result<Vec<TimelineEntry>, ServiceError> {
        Ok(item_timeline(&self.get_item(id)?))
    }
}
