//! Inventory import: natural key = serial number, first write wins.

use std::collections::HashSet;

use fieldops_core::{Clock, IdAllocator, ItemId, LogEntryId, fresh_id};
use fieldops_inventory::{Intake, InventoryItem, NewItem};

use crate::candidate::{InventoryCandidate, inventory_candidates};
use crate::delimited::parse_delimited;
use crate::engine::{IngestReport, Resolution, UpsertStrategy, ingest};
use crate::error::ParseError;

pub const BULK_IMPORT_ACTOR: &str = "Bulk Import";
pub const BULK_IMPORT_REASON: &str = "initial bulk load";
pub const PLACEHOLDER_SERIAL: &str = "SN-UNKNOWN";

/// Defaults applied to imported items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryImportSettings {
    pub actor: String,
    pub reason: String,
    /// Serial given to rows that have none.
    pub placeholder_serial: String,
    /// Image given to rows that have none.
    pub placeholder_image: String,
}

impl Default for InventoryImportSettings {
    fn default() -> Self {
        Self {
            actor: BULK_IMPORT_ACTOR.to_string(),
            reason: BULK_IMPORT_REASON.to_string(),
            placeholder_serial: PLACEHOLDER_SERIAL.to_string(),
            placeholder_image: String::new(),
        }
    }
}

/// Upsert strategy for inventory items.
///
/// Rows without a name are dropped. A serial already present (ignoring case)
/// is skipped; existing items are never overwritten.
pub struct InventoryImport<'a, C: ?Sized, I: ?Sized> {
    clock: &'a C,
    ids: &'a mut I,
    settings: InventoryImportSettings,
    taken: HashSet<String>,
}

impl<'a, C, I> InventoryImport<'a, C, I>
where
    C: Clock + ?Sized,
    I: IdAllocator + ?Sized,
{
    pub fn new(clock: &'a C, ids: &'a mut I, settings: InventoryImportSettings) -> Self {
        Self {
            clock,
            ids,
            settings,
            taken: HashSet::new(),
        }
    }
}

impl<C, I> UpsertStrategy for InventoryImport<'_, C, I>
where
    C: Clock + ?Sized,
    I: IdAllocator + ?Sized,
{
    type Entity = InventoryItem;
    type Candidate = InventoryCandidate;

    fn prepare(&mut self, existing: &[InventoryItem]) {
        self.taken = existing
            .iter()
            .map(|item| item.id_typed().to_string())
            .collect();
    }

    fn admit(&self, mut candidate: InventoryCandidate) -> Option<InventoryCandidate> {
        candidate.name.as_deref().filter(|n| !n.trim().is_empty())?;
        if candidate.serial_number.is_none() {
            candidate.serial_number = Some(self.settings.placeholder_serial.clone());
        }
        Some(candidate)
    }

    fn find_match(&self, collection: &[InventoryItem], candidate: &InventoryCandidate) -> Option<usize> {
        let serial = candidate.serial_number.as_deref()?;
        collection.iter().position(|item| item.has_serial(serial))
    }

    fn resolve(&mut self, existing: &InventoryItem, candidate: InventoryCandidate) -> Resolution<InventoryItem> {
        tracing::debug!(
            serial = existing.serial_number(),
            name = candidate.name.as_deref().unwrap_or_default(),
            "skipping duplicate serial"
        );
        Resolution::Skip
    }

    fn create(&mut self, candidate: InventoryCandidate) -> Option<InventoryItem> {
        let id = fresh_id(&mut *self.ids, &mut self.taken);
        let new = NewItem {
            id: ItemId::from(id.clone()),
            name: candidate.name.unwrap_or_default(),
            description: candidate.description.unwrap_or_default(),
            serial_number: candidate
                .serial_number
                .unwrap_or_else(|| self.settings.placeholder_serial.clone()),
            image_url: candidate
                .image_url
                .unwrap_or_else(|| self.settings.placeholder_image.clone()),
        };
        let intake = Intake {
            entry_id: LogEntryId::from(format!("log-{id}")),
            actor: self.settings.actor.clone(),
            reason: self.settings.reason.clone(),
            occurred_at: self.clock.now(),
        };

        match InventoryItem::register(new, intake) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::debug!(error = %err, "rejected import row");
                None
            }
        }
    }
}

/// Parse `text` and ingest it into `existing`.
pub fn import_inventory<C, I>(
    existing: &[InventoryItem],
    text: &str,
    clock: &C,
    ids: &mut I,
    settings: InventoryImportSettings,
) -> Result<IngestReport<InventoryItem>, ParseError>
where
    C: Clock + ?Sized,
    I: IdAllocator + ?Sized,
{
    let table = parse_delimited(text)?;
    let candidates = inventory_candidates(&table);
    let mut strategy = InventoryImport::new(clock, ids, settings);
    Ok(ingest(existing, candidates, &mut strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fieldops_core::{FixedClock, SequentialIds};
    use fieldops_inventory::InventoryStatus;

    const DRILL_CSV: &str = "Nombre,Marca,Descripción,Serie,URL Foto\n\"Taladro\",\"DeWalt\",\"Modelo X\",\"DW-1\",\"\"\n";

    fn clock() -> FixedClock {
        FixedClock::on(2024, 3, 1).unwrap()
    }

    fn run(existing: &[InventoryItem], text: &str, ids: &mut SequentialIds) -> IngestReport<InventoryItem> {
        import_inventory(existing, text, &clock(), ids, InventoryImportSettings::default()).unwrap()
    }

    #[test]
    fn drill_row_becomes_available_item() {
        let mut ids = SequentialIds::new("inv-");
        let report = run(&[], DRILL_CSV, &mut ids);

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.updated, 0);

        let item = &report.collection[0];
        assert_eq!(item.name(), "Taladro");
        assert_eq!(item.description(), "DeWalt - Modelo X");
        assert_eq!(item.serial_number(), "DW-1");
        assert_eq!(item.status(), InventoryStatus::Available);
        assert!(item.assignment_history().is_empty());
        assert!(item.maintenance_log().is_empty());

        let log = item.status_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].actor, BULK_IMPORT_ACTOR);
        assert_eq!(log[0].reason, BULK_IMPORT_REASON);
        assert_eq!(log[0].previous_status, InventoryStatus::Available);
        assert_eq!(log[0].new_status, InventoryStatus::Available);
        assert_eq!(log[0].timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(log[0].id.as_str(), format!("log-{}", item.id_typed()));
    }

    #[test]
    fn reimport_skips_and_leaves_collection_unchanged() {
        let mut ids = SequentialIds::new("inv-");
        let first = run(&[], DRILL_CSV, &mut ids);
        let second = run(&first.collection, DRILL_CSV, &mut ids);

        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(second.collection, first.collection);
    }

    #[test]
    fn serial_match_ignores_case() {
        let mut ids = SequentialIds::new("inv-");
        let first = run(&[], DRILL_CSV, &mut ids);
        let second = run(&first.collection, "name,brand,desc,serial\nOther,,,dw-1\n", &mut ids);

        assert_eq!(second.skipped, 1);
        assert_eq!(second.collection.len(), 1);
        assert_eq!(second.collection[0].name(), "Taladro");
    }

    #[test]
    fn duplicate_serials_within_batch_keep_first() {
        let text = "name;brand;desc;serial\nFirst;;;S-1\nSecond;;;s-1\nThird;;;S-2\n";
        let mut ids = SequentialIds::new("inv-");
        let report = run(&[], text, &mut ids);

        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 1);
        let names: Vec<_> = report.collection.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["First", "Third"]);
    }

    #[test]
    fn nameless_rows_are_not_counted() {
        let text = "name,brand,desc,serial\n,Acme,Thing,X-1\nLadder,,,X-2\n";
        let mut ids = SequentialIds::new("inv-");
        let report = run(&[], text, &mut ids);

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.processed(), 1);
    }

    #[test]
    fn missing_serial_gets_placeholder() {
        let mut ids = SequentialIds::new("inv-");
        let report = run(&[], "name\nHelmet\n", &mut ids);

        assert_eq!(report.collection[0].serial_number(), PLACEHOLDER_SERIAL);
    }

    #[test]
    fn new_ids_avoid_existing_and_batch_ids() {
        let mut ids = SequentialIds::new("inv-");
        let first = run(&[], "name,brand,desc,serial\nA,,,A-1\n", &mut ids);

        // Restart the allocator so it proposes ids already in use.
        let mut restarted = SequentialIds::new("inv-");
        let second = run(&first.collection, "name,brand,desc,serial\nB,,,B-1\nC,,,C-1\n", &mut restarted);

        let mut seen = HashSet::new();
        for item in &second.collection {
            assert!(seen.insert(item.id_typed().to_string()), "duplicate id {}", item.id_typed());
        }
        assert_eq!(second.collection.len(), 3);
    }

    #[test]
    fn header_only_file_imports_nothing() {
        let mut ids = SequentialIds::new("inv-");
        let report = run(&[], "Nombre,Marca,Descripción,Serie\n", &mut ids);

        assert_eq!(report.processed(), 0);
        assert!(report.collection.is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn row() -> impl Strategy<Value = (String, String)> {
            ("[A-Za-z]{1,8}", "[A-Z]{1,2}-[0-9]{1,3}")
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: a second pass over the same rows creates nothing.
            #[test]
            fn reimport_is_idempotent(rows in proptest::collection::vec(row(), 1..20)) {
                let mut text = String::from("name,brand,desc,serial\n");
                for (name, serial) in &rows {
                    text.push_str(&format!("{name},,,{serial}\n"));
                }

                let mut ids = SequentialIds::new("inv-");
                let first = run(&[], &text, &mut ids);
                let second = run(&first.collection, &text, &mut ids);

                prop_assert_eq!(first.processed(), rows.len());
                prop_assert_eq!(second.created, 0);
                prop_assert_eq!(second.skipped, rows.len());
                prop_assert_eq!(second.collection, first.collection);
            }
        }
    }
}
