use phonebook_core::db::{open_db, open_db_in_memory};
use phonebook_core::{
    PersonDraft, PersonService, PersonServiceError, PersonStore, SqlitePersonStore, StoreError,
};
use std::collections::HashSet;
use uuid::Uuid;

fn memory_store() -> SqlitePersonStore {
    SqlitePersonStore::new(open_db_in_memory().unwrap())
}

fn memory_service() -> PersonService<SqlitePersonStore> {
    PersonService::new(memory_store())
}

#[test]
fn store_insert_assigns_id_and_find_returns_same_record() {
    let store = memory_store();

    let created = store.insert(&PersonDraft::new("Ada", "09-1234567")).unwrap();
    assert!(!created.id.is_nil());

    let loaded = store
        .find_by_id(&created.id.to_string())
        .unwrap()
        .unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn store_rejects_malformed_ids_on_every_keyed_operation() {
    let store = memory_store();
    let draft = PersonDraft::new("Ada", "09-1234567");

    assert!(matches!(
        store.find_by_id("not-an-id"),
        Err(StoreError::MalformedId(id)) if id == "not-an-id"
    ));
    assert!(matches!(
        store.replace_by_id("5", &draft),
        Err(StoreError::MalformedId(_))
    ));
    assert!(matches!(
        store.delete_by_id(""),
        Err(StoreError::MalformedId(_))
    ));
}

#[test]
fn store_replace_and_delete_report_absence() {
    let store = memory_store();
    let unknown = Uuid::new_v4().to_string();

    let replaced = store
        .replace_by_id(&unknown, &PersonDraft::new("Ada", "09-1234567"))
        .unwrap();
    assert!(replaced.is_none());
    assert!(!store.delete_by_id(&unknown).unwrap());
}

#[test]
fn store_count_matches_find_all() {
    let store = memory_store();
    store.insert(&PersonDraft::new("Ada", "09-1234567")).unwrap();
    store.insert(&PersonDraft::new("Arto", "040-123456")).unwrap();

    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(store.find_all().unwrap().len(), 2);
}

#[test]
fn create_then_get_returns_identical_record() {
    let service = memory_service();

    let created = service.create("Ada", "09-1234567").unwrap();
    assert_eq!(created.name, "Ada");
    assert_eq!(created.number, "09-1234567");

    let fetched = service.get(&created.id.to_string()).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn invalid_create_persists_nothing() {
    let service = memory_service();

    let err = service.create("Al", "123456").unwrap_err();
    match err {
        PersonServiceError::Validation(validation) => {
            assert_eq!(validation.violations().len(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn get_distinguishes_malformed_and_unknown_ids() {
    let service = memory_service();

    assert!(matches!(
        service.get("not-an-id"),
        Err(PersonServiceError::InvalidId(id)) if id == "not-an-id"
    ));

    let unknown = Uuid::new_v4().to_string();
    assert!(matches!(
        service.get(&unknown),
        Err(PersonServiceError::NotFound(id)) if id == unknown
    ));
}

#[test]
fn update_preserves_id_and_replaces_fields() {
    let service = memory_service();
    let created = service.create("Ada", "09-1234567").unwrap();
    let id = created.id.to_string();

    let updated = service.update(&id, "Ada Lovelace", "040-7654321").unwrap();
    assert_eq!(updated.id, created.id);

    let fetched = service.get(&id).unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Ada Lovelace");
    assert_eq!(fetched.number, "040-7654321");
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn update_validates_like_create_and_leaves_record_untouched() {
    let service = memory_service();
    let created = service.create("Ada", "09-1234567").unwrap();
    let id = created.id.to_string();

    let err = service.update(&id, "Ada", "1-1").unwrap_err();
    assert!(matches!(err, PersonServiceError::Validation(_)));
    assert_eq!(service.get(&id).unwrap(), created);

    // Validation wins over id checks.
    assert!(matches!(
        service.update("not-an-id", "A", "1"),
        Err(PersonServiceError::Validation(_))
    ));
}

#[test]
fn update_reports_missing_and_malformed_ids() {
    let service = memory_service();

    assert!(matches!(
        service.update(&Uuid::new_v4().to_string(), "Ada", "09-1234567"),
        Err(PersonServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.update("42", "Ada", "09-1234567"),
        Err(PersonServiceError::InvalidId(_))
    ));
}

#[test]
fn delete_is_idempotent_for_well_formed_ids() {
    let service = memory_service();
    let created = service.create("Ada", "09-1234567").unwrap();
    let id = created.id.to_string();

    service.delete(&id).unwrap();
    service.delete(&id).unwrap();

    assert!(matches!(
        service.get(&id),
        Err(PersonServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete("not-an-id"),
        Err(PersonServiceError::InvalidId(_))
    ));
}

#[test]
fn list_after_creates_and_deletes_has_remaining_records() {
    let service = memory_service();
    let mut ids = Vec::new();
    for index in 0..5 {
        let person = service
            .create(format!("Person {index}"), format!("09-12345{index}"))
            .unwrap();
        ids.push(person.id);
    }
    service.delete(&ids[1].to_string()).unwrap();
    service.delete(&ids[3].to_string()).unwrap();

    let remaining: HashSet<_> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect();
    let expected: HashSet<_> = [ids[0], ids[2], ids[4]].into_iter().collect();
    assert_eq!(remaining, expected);
    assert_eq!(service.info().unwrap().person_count, 3);
}

#[test]
fn info_on_empty_store_reports_zero() {
    let service = memory_service();

    let info = service.info().unwrap();
    assert_eq!(info.person_count, 0);
    assert!(info
        .to_html()
        .starts_with("<p>Phonebook has info for 0 persons</p><p>"));
}

#[test]
fn records_survive_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.sqlite3");

    let service = PersonService::new(SqlitePersonStore::new(open_db(&path).unwrap()));
    let created = service.create("Ada", "09-1234567").unwrap();
    service.into_store().close().unwrap();

    let reopened = PersonService::new(SqlitePersonStore::new(open_db(&path).unwrap()));
    assert_eq!(reopened.get(&created.id.to_string()).unwrap(), created);
}

#[test]
fn rows_with_non_uuid_ids_surface_as_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO persons (id, name, number) VALUES (?1, ?2, ?3);",
        ["legacy-7", "Arto Hellas", "040-123456"],
    )
    .unwrap();
    drop(conn);

    let store = SqlitePersonStore::new(open_db(&path).unwrap());
    match store.find_all() {
        Err(StoreError::InvalidData(message)) => assert!(message.contains("legacy-7")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(persons) => panic!("expected invalid data, got {} persons", persons.len()),
    }

    let service = PersonService::new(store);
    assert!(matches!(service.list(), Err(PersonServiceError::Store(_))));
}
