//! `fieldops-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage concerns). Time,
//! identity and randomness are traits so every caller can inject them.

pub mod aggregate;
pub mod calendar;
pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod random;

pub use aggregate::{Aggregate, AggregateRoot};
pub use calendar::{days_between, format_calendar_date, parse_calendar_date, parse_timestamp};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ClientId, IdAllocator, ItemId, LogEntryId, SequentialIds, UuidAllocator, fresh_id};
pub use random::{CyclingRandom, RandomSource, ThreadRandom};
