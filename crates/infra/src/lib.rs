//! Infrastructure layer: storage adapters and the ledger application service.

pub mod collection;
pub mod config;
pub mod error;
pub mod service;
pub mod store;

pub use collection::{CLIENTS, CLIENTS_KEY, Collection, INVENTORY, INVENTORY_KEY};
pub use config::LedgerConfig;
pub use error::ServiceError;
pub use service::{ImportSummary, ItemDraft, LedgerService};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore, StoreError};
