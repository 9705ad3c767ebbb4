use contacts_core::db::migrations::latest_version;
use contacts_core::db::{open_db_in_memory, DbHandle};
use contacts_core::{Contact, ContactStore, SqliteContactStore, StoreError};
use rusqlite::Connection;
use std::collections::HashSet;

fn new_store() -> SqliteContactStore {
    let handle = DbHandle::new(open_db_in_memory().unwrap());
    SqliteContactStore::try_new(handle).unwrap()
}

fn seed_sample(store: &SqliteContactStore) -> (i64, i64, i64) {
    let fulano = store.insert("Fulano", "(99) 91234-5678").unwrap();
    let beltrano = store.insert("Beltrano", "(99) 923456789").unwrap();
    let sicrano = store.insert("Sicrano", "(99) 934567890").unwrap();
    (fulano, beltrano, sicrano)
}

fn names(contacts: &[Contact]) -> HashSet<&str> {
    contacts.iter().map(|contact| contact.name.as_str()).collect()
}

#[test]
fn insert_then_find_roundtrip() {
    let store = new_store();

    let id = store.insert("Fulano", "(99) 91234-5678").unwrap();
    let loaded = store.find_by_id(id).unwrap().unwrap();

    assert_eq!(loaded, Contact::new(id, "Fulano", "(99) 91234-5678"));
}

#[test]
fn find_missing_id_returns_none() {
    let store = new_store();
    store.insert("Fulano", "1").unwrap();

    assert!(store.find_by_id(9_999).unwrap().is_none());
}

#[test]
fn fetch_all_grows_on_insert_and_shrinks_on_delete() {
    let store = new_store();
    assert!(store.fetch_all().unwrap().is_empty());

    let (fulano, _, _) = seed_sample(&store);
    assert_eq!(store.fetch_all().unwrap().len(), 3);

    store.insert("Quarto", "4").unwrap();
    assert_eq!(store.fetch_all().unwrap().len(), 4);

    assert_eq!(store.delete_by_id(fulano).unwrap(), 1);
    assert_eq!(store.fetch_all().unwrap().len(), 3);
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn fetch_all_returns_insertion_order() {
    let store = new_store();
    let (fulano, beltrano, sicrano) = seed_sample(&store);

    let ids: Vec<i64> = store
        .fetch_all()
        .unwrap()
        .into_iter()
        .map(|contact| contact.id)
        .collect();
    assert_eq!(ids, vec![fulano, beltrano, sicrano]);
}

#[test]
fn every_listed_contact_roundtrips_through_find() {
    let store = new_store();
    seed_sample(&store);

    for contact in store.fetch_all().unwrap() {
        assert_eq!(store.find_by_id(contact.id).unwrap(), Some(contact));
    }
}

#[test]
fn update_replaces_only_target_row() {
    let store = new_store();
    let (fulano, beltrano, sicrano) = seed_sample(&store);

    let changed = store
        .update(&Contact::new(beltrano, "Beltrano Silva", "(11) 5555-0000"))
        .unwrap();
    assert_eq!(changed, 1);

    assert_eq!(
        store.find_by_id(beltrano).unwrap().unwrap(),
        Contact::new(beltrano, "Beltrano Silva", "(11) 5555-0000")
    );
    assert_eq!(
        store.find_by_id(fulano).unwrap().unwrap(),
        Contact::new(fulano, "Fulano", "(99) 91234-5678")
    );
    assert_eq!(
        store.find_by_id(sicrano).unwrap().unwrap(),
        Contact::new(sicrano, "Sicrano", "(99) 934567890")
    );
}

#[test]
fn update_missing_id_affects_zero_rows() {
    let store = new_store();
    seed_sample(&store);
    let before = store.fetch_all().unwrap();

    let changed = store.update(&Contact::new(404, "Ghost", "0")).unwrap();

    assert_eq!(changed, 0);
    assert_eq!(store.fetch_all().unwrap(), before);
}

#[test]
fn delete_missing_id_affects_zero_rows() {
    let store = new_store();
    seed_sample(&store);
    let before = store.fetch_all().unwrap();

    assert_eq!(store.delete_by_id(404).unwrap(), 0);
    assert_eq!(store.fetch_all().unwrap(), before);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = new_store();
    let first = store.insert("Fulano", "1").unwrap();
    let second = store.insert("Beltrano", "2").unwrap();
    store.delete_by_id(second).unwrap();

    let third = store.insert("Sicrano", "3").unwrap();

    assert!(second > first);
    assert!(third > second);
}

#[test]
fn store_does_not_validate_blank_fields() {
    let store = new_store();
    let id = store.insert("", "   ").unwrap();

    let loaded = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "");
    assert_eq!(loaded.phone, "   ");
}

#[test]
fn empty_search_returns_every_row() {
    let store = new_store();
    seed_sample(&store);

    assert_eq!(store.search("").unwrap(), store.fetch_all().unwrap());
}

#[test]
fn search_matches_name_substrings() {
    let store = new_store();
    seed_sample(&store);

    assert_eq!(
        names(&store.search("an").unwrap()),
        HashSet::from(["Fulano", "Beltrano", "Sicrano"])
    );
    assert_eq!(names(&store.search("ul").unwrap()), HashSet::from(["Fulano"]));
    assert_eq!(names(&store.search("tr").unwrap()), HashSet::from(["Beltrano"]));

    let exact = store.search("Sicrano").unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].phone, "(99) 934567890");

    assert!(store.search("zzz").unwrap().is_empty());
}

#[test]
fn search_ignores_ascii_case() {
    let store = new_store();
    seed_sample(&store);

    assert_eq!(names(&store.search("FUL").unwrap()), HashSet::from(["Fulano"]));
    assert_eq!(names(&store.search("sIcR").unwrap()), HashSet::from(["Sicrano"]));
}

#[test]
fn search_does_not_match_phone() {
    let store = new_store();
    seed_sample(&store);

    assert!(store.search("91234").unwrap().is_empty());
}

#[test]
fn search_treats_wildcards_literally() {
    let store = new_store();
    store.insert("100% Real", "1").unwrap();
    store.insert("snake_case", "2").unwrap();
    store.insert("plain", "3").unwrap();

    assert_eq!(names(&store.search("%").unwrap()), HashSet::from(["100% Real"]));
    assert_eq!(names(&store.search("_").unwrap()), HashSet::from(["snake_case"]));
    assert!(store.search("\\").unwrap().is_empty());
}

#[test]
fn closed_handle_reports_unavailable_instead_of_empty() {
    let handle = DbHandle::new(open_db_in_memory().unwrap());
    let store = SqliteContactStore::try_new(handle.clone()).unwrap();
    seed_sample(&store);

    handle.close().unwrap();

    assert!(store.fetch_all().unwrap_err().is_unavailable());
    assert!(store.search("an").unwrap_err().is_unavailable());
    assert!(store.insert("Late", "0").unwrap_err().is_unavailable());
    assert!(store.delete_by_id(1).unwrap_err().is_unavailable());
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let handle = DbHandle::new(Connection::open_in_memory().unwrap());

    match SqliteContactStore::try_new(handle) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn try_new_rejects_missing_table_and_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    let result = SqliteContactStore::try_new(DbHandle::new(conn));
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("contacts"))
    ));

    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE contacts (_id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();
    let result = SqliteContactStore::try_new(DbHandle::new(conn));
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "contacts",
            column: "phone"
        })
    ));
}
