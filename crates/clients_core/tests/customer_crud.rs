use clients_core::db::open_db_in_memory;
use clients_core::{
    ConstraintKind, CustomerRepository, CustomerStore, RepoError, SqliteCustomerRepository,
};
use rusqlite::Connection;

fn ready_store(conn: &Connection) -> CustomerStore<SqliteCustomerRepository<'_>> {
    let store = CustomerStore::new(SqliteCustomerRepository::try_new(conn).unwrap());
    store.create_schema().unwrap();
    store
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn add_customer_returns_sequential_ids_and_persists_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let first = store.add_customer("John", "Doe", "john@x.com").unwrap();
    let second = store.add_customer("Jane", "Smith", "jane@x.com").unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 2);

    let loaded = store.get_customer(first).unwrap().unwrap();
    assert_eq!(loaded.first_name, "John");
    assert_eq!(loaded.last_name, "Doe");
    assert_eq!(loaded.email, "john@x.com");
}

#[test]
fn duplicate_email_is_unique_violation_and_count_is_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    store.add_customer("John", "Doe", "dup@x.com").unwrap();
    let err = store.add_customer("Johnny", "Dee", "dup@x.com").unwrap_err();

    assert!(err.is_constraint_violation());
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM customers;"), 1);
}

#[test]
fn phone_for_missing_customer_is_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let err = store.add_phone(42, "+100").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM phones;"), 0);
}

#[test]
fn over_long_values_are_rejected_by_check_constraints() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let long_name = "n".repeat(51);
    let err = store.add_customer(&long_name, "Doe", "long@x.com").unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));

    let id = store.add_customer("Ok", "Name", "ok@x.com").unwrap();
    let err = store.add_phone(id, "+1234567890123456").unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    store.add_phone(id, "+12345678901234").unwrap();
}

#[test]
fn update_overwrites_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let id = store.add_customer("John", "Doe", "john@x.com").unwrap();
    let changed = store
        .update_customer(id, "Johnathan", "Doe-Smith", "john@new.com")
        .unwrap();
    assert_eq!(changed, 1);

    let loaded = store.get_customer(id).unwrap().unwrap();
    assert_eq!(loaded.first_name, "Johnathan");
    assert_eq!(loaded.last_name, "Doe-Smith");
    assert_eq!(loaded.email, "john@new.com");
}

#[test]
fn update_and_remove_of_missing_id_are_silent_noops() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    assert_eq!(store.update_customer(99, "A", "B", "c@x.com").unwrap(), 0);
    assert_eq!(store.remove_customer(99).unwrap(), 0);
    assert_eq!(store.remove_phone(99, "+1").unwrap(), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM customers;"), 0);
}

#[test]
fn update_to_taken_email_fails_and_keeps_original_row() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    store.add_customer("John", "Doe", "john@x.com").unwrap();
    let jane = store.add_customer("Jane", "Smith", "jane@x.com").unwrap();

    let err = store
        .update_customer(jane, "Jane", "Doe", "john@x.com")
        .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));

    let loaded = store.get_customer(jane).unwrap().unwrap();
    assert_eq!(loaded.last_name, "Smith");
    assert_eq!(loaded.email, "jane@x.com");
}

#[test]
fn remove_phone_deletes_every_exact_match_only() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let john = store.add_customer("John", "Doe", "john@x.com").unwrap();
    let jane = store.add_customer("Jane", "Smith", "jane@x.com").unwrap();
    store.add_phone(john, "+1").unwrap();
    store.add_phone(john, "+1").unwrap();
    store.add_phone(john, "+2").unwrap();
    store.add_phone(jane, "+1").unwrap();

    assert_eq!(store.remove_phone(john, "+1").unwrap(), 2);

    let johns: Vec<_> = store
        .list_phones(john)
        .unwrap()
        .into_iter()
        .map(|phone| phone.phone_number)
        .collect();
    assert_eq!(johns, vec!["+2"]);
    assert_eq!(store.list_phones(jane).unwrap().len(), 1);
}

#[test]
fn remove_customer_cascades_to_phones() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let john = store.add_customer("John", "Doe", "john@x.com").unwrap();
    let jane = store.add_customer("Jane", "Smith", "jane@x.com").unwrap();
    store.add_phone(john, "+1").unwrap();
    store.add_phone(jane, "+2").unwrap();
    store.add_phone(jane, "+3").unwrap();

    assert_eq!(store.remove_customer(jane).unwrap(), 1);

    assert!(store.get_customer(jane).unwrap().is_none());
    assert!(store.list_phones(jane).unwrap().is_empty());
    assert_eq!(
        count(
            &conn,
            "SELECT COUNT(*) FROM phones p
             LEFT JOIN customers c ON c.id = p.customer_id
             WHERE c.id IS NULL;"
        ),
        0
    );
    assert_eq!(store.list_phones(john).unwrap().len(), 1);
}

#[test]
fn removed_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    let first = store.add_customer("A", "A", "a@x.com").unwrap();
    store.remove_customer(first).unwrap();
    let second = store.add_customer("B", "B", "b@x.com").unwrap();
    assert!(second > first);
}

#[test]
fn failed_write_leaves_no_open_transaction() {
    let conn = open_db_in_memory().unwrap();
    let store = ready_store(&conn);

    store.add_customer("John", "Doe", "john@x.com").unwrap();
    store.add_customer("John", "Doe", "john@x.com").unwrap_err();

    assert!(conn.is_autocommit());
    store.add_customer("Jane", "Smith", "jane@x.com").unwrap();
}

#[test]
fn repository_rejects_connection_without_foreign_keys() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::ForeignKeysDisabled)));

    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    assert!(SqliteCustomerRepository::try_new(&conn).is_ok());
}

#[test]
fn repository_works_without_service_wrapper() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();
    repo.create_customer_table().unwrap();
    repo.create_phone_table().unwrap();

    let id = repo.add_customer("Solo", "Repo", "solo@x.com").unwrap();
    let phone_id = repo.add_phone(id, "+7").unwrap();
    let phones = repo.list_phones(id).unwrap();

    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].id, phone_id);
    assert_eq!(phones[0].customer_id, id);
}
