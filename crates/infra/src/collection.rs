//! Typed collections on top of a [`KeyValueStore`].

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use fieldops_clients::Client;
use fieldops_inventory::InventoryItem;

use crate::store::{KeyValueStore, StoreError};

pub const INVENTORY_KEY: &str = "app_inventory";
pub const CLIENTS_KEY: &str = "app_clients";

/// A whole collection of `T` stored as one JSON array under `key`.
#[derive(Debug)]
pub struct Collection<T> {
    key: &'static str,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Collection<T> {}

impl<T> Collection<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _entity: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// The stored collection; empty if nothing was ever written.
    pub fn get_all<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<Vec<T>, StoreError> {
        let Some(raw) = store.get(self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Codec {
            key: self.key.to_string(),
            source,
        })
    }

    /// Replace the stored collection.
    pub fn set_all<S: KeyValueStore + ?Sized>(&self, store: &S, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items).map_err(|source| StoreError::Codec {
            key: self.key.to_string(),
            source,
        })?;
        store.set(self.key, raw)
    }
}

pub const INVENTORY: Collection<InventoryItem> = Collection::new(INVENTORY_KEY);
pub const CLIENTS: Collection<Client> = Collection::new(CLIENTS_KEY);
