//! Bulk ingestion of delimited text into inventory and client collections.
//!
//! Parsing produces typed, all-optional candidate records; an
//! [`UpsertStrategy`] decides how each candidate is admitted, matched by its
//! natural key and turned into an entity.

pub mod candidate;
pub mod clients;
pub mod delimited;
pub mod engine;
pub mod error;
pub mod inventory;

pub use candidate::{ClientCandidate, InventoryCandidate, client_candidates, inventory_candidates};
pub use clients::{ClientImport, import_clients};
pub use delimited::{DelimitedTable, Delimiter, clean_field, detect_delimiter, parse_delimited};
pub use engine::{IngestReport, Resolution, UpsertStrategy, ingest};
pub use error::ParseError;
pub use inventory::{
    BULK_IMPORT_ACTOR, BULK_IMPORT_REASON, InventoryImport, InventoryImportSettings,
    PLACEHOLDER_SERIAL, import_inventory,
};
