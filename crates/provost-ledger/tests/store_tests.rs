//! Integration tests for the ledger store against a sqlite file.

use std::collections::BTreeSet;

use sqlx::any::AnyPoolOptions;
use tempfile::TempDir;

use provost_ledger::{LedgerStore, StorageMode};

/// Creates a sqlite ledger file with the upstream schema and some fixtures.
async fn seed_ledger(dir: &TempDir) -> String {
    sqlx::any::install_default_drivers();
    let path = dir.path().join("ledger.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap();

    let ddl = [
        "CREATE TABLE Departments (Name TEXT PRIMARY KEY)",
        "CREATE TABLE Offices (Office TEXT PRIMARY KEY, Address TEXT, City TEXT, \
         State TEXT, Country TEXT, Zip TEXT)",
        "CREATE TABLE Companies (Abbreviation TEXT PRIMARY KEY, Name TEXT, Domain TEXT)",
        "CREATE TABLE Existing_Prefixes (Prefix TEXT)",
        "INSERT INTO Departments (Name) VALUES ('Engineering'), ('Sales')",
        "INSERT INTO Offices (Office, Address, City, State, Country, Zip) \
         VALUES ('NYC', '1 Wall St', 'NYC', 'NY', 'US', '10005')",
        "INSERT INTO Companies (Abbreviation, Name, Domain) \
         VALUES ('ACME', 'Acme Corporation', 'acme.example.com')",
        "INSERT INTO Existing_Prefixes (Prefix) VALUES ('jdoe'), ('asmith')",
    ];
    for statement in ddl {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool.close().await;

    url
}

#[tokio::test]
async fn test_load_reference_tables() {
    let dir = TempDir::new().unwrap();
    let url = seed_ledger(&dir).await;

    let store = LedgerStore::connect(StorageMode::Sqlite, &url).await.unwrap();
    let refs = store.load_reference_tables().await.unwrap();

    assert!(refs.departments.contains("Engineering"));
    assert!(refs.departments.contains("Sales"));

    let office = refs.offices.get("NYC").unwrap();
    assert_eq!(office.address, "1 Wall St");
    assert_eq!(office.zip, "10005");

    let company = refs.companies.get("ACME").unwrap();
    assert_eq!(company.name, "Acme Corporation");
    assert_eq!(company.domain, "acme.example.com");
}

#[tokio::test]
async fn test_load_reserved_prefixes() {
    let dir = TempDir::new().unwrap();
    let url = seed_ledger(&dir).await;

    let store = LedgerStore::connect(StorageMode::Sqlite, &url).await.unwrap();
    let prefixes = store.load_reserved_prefixes().await.unwrap();

    assert_eq!(prefixes.len(), 2);
    assert!(prefixes.contains("jdoe"));
    assert!(prefixes.contains("asmith"));
}

#[tokio::test]
async fn test_append_prefixes_round_trip() {
    let dir = TempDir::new().unwrap();
    let url = seed_ledger(&dir).await;

    let store = LedgerStore::connect(StorageMode::Sqlite, &url).await.unwrap();

    let delta: BTreeSet<String> = ["jroe".to_string(), "bmoor".to_string()].into();
    store.append_prefixes(&delta).await.unwrap();

    let prefixes = store.load_reserved_prefixes().await.unwrap();
    assert_eq!(prefixes.len(), 4);
    assert!(prefixes.contains("jroe"));
    assert!(prefixes.contains("bmoor"));
}

#[tokio::test]
async fn test_append_empty_delta_is_noop() {
    let dir = TempDir::new().unwrap();
    let url = seed_ledger(&dir).await;

    let store = LedgerStore::connect(StorageMode::Sqlite, &url).await.unwrap();
    store.append_prefixes(&BTreeSet::new()).await.unwrap();

    let prefixes = store.load_reserved_prefixes().await.unwrap();
    assert_eq!(prefixes.len(), 2);
}

#[tokio::test]
async fn test_connect_failure_is_connection_error() {
    sqlx::any::install_default_drivers();
    let err = LedgerStore::connect(
        StorageMode::Sqlite,
        "sqlite:///nonexistent-dir/definitely/missing.db",
    )
    .await
    .unwrap_err();
    assert!(err.is_connection_error());
}
