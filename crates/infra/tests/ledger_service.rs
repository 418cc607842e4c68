//! End-to-end tests: service operations against real store adapters.

use std::sync::Arc;

use fieldops_clients::{COLOR_PALETTE, Client, ClientStatus};
use fieldops_core::{ClientId, CyclingRandom, DomainError, FixedClock, ItemId, SequentialIds};
use fieldops_infra::{
    CLIENTS, INVENTORY, InMemoryStore, ItemDraft, JsonFileStore, KeyValueStore, LedgerConfig,
    LedgerService, ServiceError,
};
use fieldops_inventory::{
    Actor, AssignPayload, AssignmentDuration, InventoryStatus, LifecycleAction, MaintenancePayload,
    TimelineEntry,
};

type Service<S> = LedgerService<S, FixedClock, SequentialIds, CyclingRandom>;

fn service<S: KeyValueStore>(store: S) -> Service<S> {
    LedgerService::new(
        store,
        FixedClock::on(2024, 5, 10).unwrap(),
        SequentialIds::new("id-"),
        CyclingRandom::new(),
        LedgerConfig::default(),
    )
}

fn drill(svc: &mut Service<impl KeyValueStore>) -> ItemId {
    svc.register_item(
        ItemDraft {
            name: "Drill-1".to_string(),
            serial_number: "SN-001".to_string(),
            ..ItemDraft::default()
        },
        "Alice",
    )
    .unwrap()
    .id_typed()
    .clone()
}

fn acme(svc: &mut Service<impl KeyValueStore>) -> ClientId {
    svc.add_client(Client::new(ClientId::from(""), "Acme", ""))
        .unwrap()
        .id
}

fn assign_to(client: &ClientId, label: &str, receiver: &str) -> LifecycleAction {
    LifecycleAction::Assign(AssignPayload {
        subject_id: Some(client.clone()),
        subject_label: label.to_string(),
        receiving_party_name: receiver.to_string(),
        observations: None,
    })
}

#[test]
fn assign_then_maintenance_is_persisted() {
    let mut svc = service(InMemoryStore::new());
    let item_id = drill(&mut svc);
    let client = acme(&mut svc);

    let assigned = svc
        .transition_item(&item_id, assign_to(&client, "Acme", "Bob"), Actor::new("Alice"))
        .unwrap();
    assert_eq!(assigned.status(), InventoryStatus::Assigned);
    assert_eq!(assigned.status_log().len(), 2);

    svc.transition_item(
        &item_id,
        LifecycleAction::SendToMaintenance(MaintenancePayload {
            workshop_name: "FixIt".to_string(),
            receiver_name: "Sam".to_string(),
            reason: "motor noise".to_string(),
            observations: None,
            photo: None,
        }),
        Actor::new("Alice"),
    )
    .unwrap();

    let stored = svc.get_item(&item_id).unwrap();
    assert_eq!(stored.status(), InventoryStatus::InMaintenance);
    assert!(stored.active_assignment().is_none());
    assert_eq!(stored.assignment_history().len(), 1);
    assert_eq!(stored.assignment_history()[0].end_date.as_deref(), Some("10/05/2024"));
    assert_eq!(stored.status_log().len(), 3);
    assert_eq!(stored.maintenance_log().len(), 1);
    stored.check_invariants().unwrap();
}

#[test]
fn refused_transition_leaves_store_untouched() {
    let mut svc = service(InMemoryStore::new());
    let item_id = drill(&mut svc);
    let before = svc.list_items().unwrap();

    let err = svc
        .transition_item(&item_id, LifecycleAction::Retire, Actor::new("Bob"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Forbidden(_))));
    assert!(err.is_recoverable());

    let err = svc
        .transition_item(&item_id, LifecycleAction::Release, Actor::new("Bob"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidTransition { .. })
    ));

    assert_eq!(svc.list_items().unwrap(), before);
}

#[test]
fn client_history_shows_active_assignment_once() {
    let mut svc = service(InMemoryStore::new());
    let item_id = drill(&mut svc);
    let client = acme(&mut svc);
    svc.transition_item(&item_id, assign_to(&client, "Acme", "Bob"), Actor::new("Alice"))
        .unwrap();

    let rows = svc.client_history(&client).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_current);
    assert_eq!(rows[0].duration, AssignmentDuration::InProgress);
    assert_eq!(rows[0].item_id, item_id);
}

#[test]
fn reassignment_moves_history_between_clients() {
    let mut svc = service(InMemoryStore::new());
    let item_id = drill(&mut svc);
    let first = acme(&mut svc);
    let second = svc
        .add_client(Client::new(ClientId::from(""), "Beta", ""))
        .unwrap()
        .id;

    svc.transition_item(&item_id, assign_to(&first, "Acme", "Bob"), Actor::new("Alice"))
        .unwrap();
    svc.transition_item(&item_id, assign_to(&second, "Beta", "Eve"), Actor::new("Alice"))
        .unwrap();

    let acme_rows = svc.client_history(&first).unwrap();
    assert_eq!(acme_rows.len(), 1);
    assert!(!acme_rows[0].is_current);
    assert_eq!(acme_rows[0].duration, AssignmentDuration::Days(0));

    let beta_rows = svc.client_history(&second).unwrap();
    assert_eq!(beta_rows.len(), 1);
    assert!(beta_rows[0].is_current);
}

#[test]
fn history_of_unknown_client_is_not_found() {
    let svc = service(InMemoryStore::new());
    let err = svc.client_history(&ClientId::from("CL-404")).unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));
}

#[test]
fn inventory_import_is_idempotent_through_the_store() {
    let mut svc = service(InMemoryStore::new());
    let csv = "Nombre,Marca,Descripción,Serie,URL Foto\n\"Taladro\",\"DeWalt\",\"Modelo X\",\"DW-1\",\"\"\n";

    let first = svc.import_inventory_csv(csv).unwrap();
    assert_eq!((first.created, first.skipped), (1, 0));
    let raw_after_first = svc.store().get(INVENTORY.key()).unwrap();

    let second = svc.import_inventory_csv(csv).unwrap();
    assert_eq!((second.created, second.skipped), (0, 1));
    assert_eq!(svc.store().get(INVENTORY.key()).unwrap(), raw_after_first);

    let items = svc.list_items().unwrap();
    assert_eq!(items[0].description(), "DeWalt - Modelo X");
}

#[test]
fn client_import_keeps_identity_and_stats() {
    let mut svc = service(InMemoryStore::new());
    let mut existing = Client::new(ClientId::from("CL-001"), "Acme", COLOR_PALETTE[3]);
    existing.tax_id = "900-1".to_string();
    existing.total_visits = 12;
    CLIENTS.set_all(svc.store(), &[existing]).unwrap();

    let summary = svc
        .import_clients_csv("NIT;Nombre;Correo\n900-1;Acme Holdings;info@acme.test\n901-2;Beta;b@beta.test\n")
        .unwrap();
    assert_eq!((summary.created, summary.updated), (1, 1));

    let clients = svc.list_clients().unwrap();
    assert_eq!(clients[0].id.as_str(), "CL-001");
    assert_eq!(clients[0].total_visits, 12);
    assert_eq!(clients[0].color_class, COLOR_PALETTE[3]);
    assert_eq!(clients[0].name, "Acme Holdings");
    assert_eq!(clients[1].id.as_str(), "CL-002");
    assert_eq!(clients[1].status, ClientStatus::Active);
}

#[test]
fn empty_import_text_is_a_parse_error() {
    let mut svc = service(InMemoryStore::new());
    let err = svc.import_inventory_csv("\u{feff}\n").unwrap_err();
    assert!(matches!(err, ServiceError::Parse(_)));
}

#[test]
fn duplicate_serial_registration_conflicts() {
    let mut svc = service(InMemoryStore::new());
    drill(&mut svc);
    let err = svc
        .register_item(
            ItemDraft {
                name: "Another drill".to_string(),
                serial_number: "sn-001".to_string(),
                ..ItemDraft::default()
            },
            "Alice",
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
}

#[test]
fn deleting_a_client_keeps_label_matches() {
    let mut svc = service(InMemoryStore::new());
    let item_id = drill(&mut svc);
    let client = acme(&mut svc);
    svc.transition_item(&item_id, assign_to(&client, "Acme", "Bob"), Actor::new("Alice"))
        .unwrap();

    svc.delete_client(&client).unwrap();
    assert!(svc.list_clients().unwrap().is_empty());
    assert!(svc.get_item(&item_id).unwrap().active_assignment().is_some());
}

#[test]
fn item_timeline_reads_the_status_log() {
    let mut svc = service(InMemoryStore::new());
    let item_id = drill(&mut svc);
    svc.transition_item(&item_id, LifecycleAction::Retire, Actor::privileged("Admin"))
        .unwrap();

    let timeline = svc.item_timeline(&item_id).unwrap();
    assert_eq!(timeline.len(), 2);
    assert!(timeline.iter().all(|e| matches!(e, TimelineEntry::Status(_))));
}

#[test]
fn file_store_state_survives_a_new_service() {
    let dir = tempfile::tempdir().unwrap();
    let item_id = {
        let mut svc = service(JsonFileStore::open(dir.path()).unwrap());
        drill(&mut svc)
    };

    let svc = service(Arc::new(JsonFileStore::open(dir.path()).unwrap()));
    let item = svc.get_item(&item_id).unwrap();
    assert_eq!(item.serial_number(), "SN-001");
    assert_eq!(item.status(), InventoryStatus::Available);
}
