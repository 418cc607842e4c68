//! Clients domain module: the subjects equipment is assigned to.
//!
//! Only the client fields the ledger and the bulk import touch live here;
//! visit scheduling and reporting are handled elsewhere.

pub mod client;
pub mod directory;

pub use client::{
    CLIENT_ID_PREFIX, COLOR_PALETTE, Client, ClientStatus, initials, next_sequence, pick_color,
    sequential_client_id,
};
pub use directory::{add_client, delete_client, find_client, update_client};
