//! Strongly-typed identifiers and identity allocation.
//!
//! Identifiers are opaque strings: records created in the browser store carry
//! ids such as `"1"`, `"1697040000000-3"` or `"CL-001"`, so nothing here
//! assumes a UUID layout even though new ids are UUIDv7 by default.

use core::str::FromStr;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier of a client (also used as the subject of an assignment).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

/// Identifier of a status-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntryId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(format!("{} cannot be empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_string_newtype!(ItemId, "ItemId");
impl_string_newtype!(ClientId, "ClientId");
impl_string_newtype!(LogEntryId, "LogEntryId");

/// Source of fresh opaque identifiers.
///
/// Implementations guarantee uniqueness for their own output; callers that
/// must also avoid ids already present in a collection use [`fresh_id`].
pub trait IdAllocator {
    fn new_id(&mut self) -> String;
}

impl<A: IdAllocator + ?Sized> IdAllocator for &mut A {
    fn new_id(&mut self) -> String {
        (**self).new_id()
    }
}

impl<A: IdAllocator + ?Sized> IdAllocator for Box<A> {
    fn new_id(&mut self) -> String {
        (**self).new_id()
    }
}

/// UUIDv7 (time-ordered) identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidAllocator;

impl IdAllocator for UuidAllocator {
    fn new_id(&mut self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Deterministic `<prefix><n>` identifiers for tests and fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }
}

impl IdAllocator for SequentialIds {
    fn new_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Draw ids from `ids` until one is not in `taken`, then reserve it.
pub fn fresh_id<A: IdAllocator + ?Sized>(ids: &mut A, taken: &mut HashSet<String>) -> String {
    loop {
        let candidate = ids.new_id();
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}
