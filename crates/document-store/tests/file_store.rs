//! Integration tests for the JSON-file backed data store.

use common::RecordId;
use document_store::{
    DataStore, JsonFileBackend, Record, StoreConfig, StoreError, UpdateOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Customer {
    id: RecordId,
    name: String,
    email: String,
}

impl Record for Customer {
    const DATASET: &'static str = "customers";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

fn store_in(dir: &tempfile::TempDir) -> DataStore<JsonFileBackend> {
    let config = StoreConfig::new(dir.path().join("data"), "test");
    DataStore::new(JsonFileBackend::from_config(&config))
}

#[tokio::test]
async fn test_load_creates_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.load().await.unwrap();

    assert!(dir.path().join("data").is_dir());
    assert!(store.is_loaded().await);
}

#[tokio::test]
async fn test_operations_before_load_fail() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert!(matches!(
        store.append("customers", json!({})).await,
        Err(StoreError::NotLoaded)
    ));
    assert!(matches!(
        store.find("customers", "id", "a1").await,
        Err(StoreError::NotLoaded)
    ));
    assert!(matches!(store.unload().await, Err(StoreError::NotLoaded)));
}

#[tokio::test]
async fn test_records_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.load().await.unwrap();

    let customer = Customer {
        id: RecordId::new("c0de"),
        name: "Rafael Fidelis".to_string(),
        email: "rafa@example.com".to_string(),
    };
    store.append_record(&customer).await.unwrap();

    store.reload().await.unwrap();

    let found: Option<Customer> = store.find_record("name", "Rafael Fidelis").await.unwrap();
    assert_eq!(found, Some(customer));
    let missing: Option<Customer> = store.find_record("name", "Another name").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_update_record_is_durable() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.load().await.unwrap();

    let mut customer = Customer {
        id: RecordId::new("c0de"),
        name: "Rafael Fidelis".to_string(),
        email: "rafa@example.com".to_string(),
    };
    store.append_record(&customer).await.unwrap();

    let outcome = store
        .update_record(&mut customer, |record| {
            assert_eq!(record.name, "Rafael Fidelis");
            record.name = "New Name".to_string();
        })
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Replaced);

    // A second handle over the same file sees the committed change.
    let other = store_in(&dir);
    other.load().await.unwrap();
    let found: Customer = other.find_record("name", "New Name").await.unwrap().unwrap();
    assert_eq!(found.name, "New Name");
    assert_eq!(customer.name, "New Name");
}

#[tokio::test]
async fn test_reset_deletes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.load().await.unwrap();
    store
        .transaction(|tx| {
            tx.dataset_mut("customers");
            tx.commit();
        })
        .await
        .unwrap();

    let path = store.backend().path().to_path_buf();
    assert!(path.exists());

    store.reset().await.unwrap();

    assert!(!path.exists());
    assert!(!store.is_loaded().await);
}
