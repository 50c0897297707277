use mycontact_core::db::migrations::{latest_version, store_version};
use mycontact_core::db::{open_db, open_db_in_memory, open_db_read_only, DbError};
use mycontact_core::{RepoError, SqliteContactRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contacts");
    assert_table_exists(&conn, "data");
    assert!(SqliteContactRepository::try_new(&conn).is_ok());
}

#[test]
fn opening_same_store_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO contacts (_id, display_name) VALUES ('1', 'Ann');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_store_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::StoreTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_only_open_does_not_migrate_and_repository_reports_missing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foreign.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE contacts (_id TEXT, display_name TEXT);")
        .unwrap();
    drop(conn);

    let conn = open_db_read_only(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
    match SqliteContactRepository::try_new(&conn) {
        Err(RepoError::MissingRequiredColumn { table, column }) => {
            assert_eq!(table, "contacts");
            assert_eq!(column, "name_raw_contact_id");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("incomplete store must be rejected"),
    }

    let write = conn.execute("INSERT INTO contacts (_id) VALUES ('1');", []);
    assert!(write.is_err(), "read-only store must reject writes");
}

#[test]
fn repository_rejects_store_without_contacts_table() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteContactRepository::try_new(&conn) {
        Err(RepoError::MissingRequiredTable(table)) => assert_eq!(table, "contacts"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("empty store must be rejected"),
    }
}

#[test]
fn read_only_open_of_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_db_read_only(dir.path().join("absent.db")).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

fn schema_version(conn: &Connection) -> u32 {
    store_version(conn).unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
