use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{Record, Result, UpdateOutcome};

/// A single stored document.
pub type Document = Value;

/// Every dataset in the store, keyed by name.
pub type Datasets = BTreeMap<String, Vec<Document>>;

/// Backing storage for a [`DataStore`].
///
/// A backend only moves whole snapshots in and out; all dataset semantics
/// live in the store itself.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Makes sure the storage location exists.
    async fn prepare(&self) -> Result<()>;

    /// Reads the persisted datasets.
    ///
    /// Returns empty datasets when nothing has been persisted yet.
    async fn read(&self) -> Result<Datasets>;

    /// Replaces the persisted datasets.
    async fn write(&self, datasets: &Datasets) -> Result<()>;

    /// Deletes the persisted datasets. Deleting absent storage is not an error.
    async fn delete(&self) -> Result<()>;

    /// Human-readable description of the storage location, for logs.
    fn describe(&self) -> String;
}

/// Unit of work handed to a [`DataStore::transaction`] closure.
///
/// Holds a working copy of every dataset. Changes become durable only if
/// [`commit`](Self::commit) is called before the closure returns.
#[derive(Debug)]
pub struct Transaction {
    datasets: Datasets,
    committed: bool,
}

impl Transaction {
    fn new(datasets: Datasets) -> Self {
        Self {
            datasets,
            committed: false,
        }
    }

    /// Returns the named dataset, if it exists.
    pub fn dataset(&self, name: &str) -> Option<&Vec<Document>> {
        self.datasets.get(name)
    }

    /// Returns the named dataset for mutation, creating it empty if absent.
    pub fn dataset_mut(&mut self, name: &str) -> &mut Vec<Document> {
        self.datasets.entry(name.to_string()).or_default()
    }

    /// Marks the working copy to be persisted when the closure returns.
    pub fn commit(&mut self) {
        self.committed = true;
    }
}

/// Handle to a transactional, named-dataset document store.
///
/// The handle is cheap to clone; clones share the same loaded state. It has
/// to be [`load`](Self::load)ed before any dataset operation.
pub struct DataStore<B: StorageBackend> {
    backend: Arc<B>,
    handle: Arc<RwLock<Option<Datasets>>>,
}

impl<B: StorageBackend> Clone for DataStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<B: StorageBackend> DataStore<B> {
    /// Creates an unloaded store over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the store. Does nothing if it is already loaded.
    #[tracing::instrument(skip(self), fields(storage = %self.backend.describe()))]
    pub async fn load(&self) -> Result<()> {
        let mut handle = self.handle.write().await;
        if handle.is_some() {
            return Ok(());
        }

        self.backend.prepare().await?;
        let datasets = self.backend.read().await?;
        tracing::debug!(datasets = datasets.len(), "data store loaded");
        *handle = Some(datasets);

        Ok(())
    }

    /// Releases the in-memory handle.
    ///
    /// Fails with [`StoreError::NotLoaded`](crate::StoreError::NotLoaded)
    /// if the store was never loaded.
    #[tracing::instrument(skip(self))]
    pub async fn unload(&self) -> Result<()> {
        let mut handle = self.handle.write().await;
        if handle.take().is_none() {
            return Err(crate::StoreError::NotLoaded);
        }
        Ok(())
    }

    /// Returns true if the store is loaded.
    pub async fn is_loaded(&self) -> bool {
        self.handle.read().await.is_some()
    }

    /// Unloads the store and deletes its backing storage.
    #[tracing::instrument(skip(self), fields(storage = %self.backend.describe()))]
    pub async fn reset(&self) -> Result<()> {
        self.unload().await?;
        self.backend.delete().await?;
        tracing::info!("data store reset");
        Ok(())
    }

    /// Unloads the store and loads it again from the backing storage.
    pub async fn reload(&self) -> Result<()> {
        self.unload().await?;
        self.load().await
    }

    /// Runs `f` against a working copy of every dataset.
    ///
    /// If `f` commits, the working copy is written through the backend and
    /// replaces the loaded state; otherwise it is discarded. The store stays
    /// locked for the whole call, so transactions never interleave within
    /// one process.
    pub async fn transaction<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Transaction) -> R + Send,
        R: Send,
    {
        let mut handle = self.handle.write().await;
        let current = handle.as_ref().ok_or(crate::StoreError::NotLoaded)?;

        let mut tx = Transaction::new(current.clone());
        let output = f(&mut tx);

        if tx.committed {
            self.backend.write(&tx.datasets).await?;
            *handle = Some(tx.datasets);
            metrics::counter!("store_commits_total").increment(1);
        }

        Ok(output)
    }

    /// Appends a document to a dataset, creating the dataset if needed.
    #[tracing::instrument(skip(self, document))]
    pub async fn append(&self, dataset: &str, document: Document) -> Result<()> {
        self.transaction(|tx| {
            tx.dataset_mut(dataset).push(document);
            tx.commit();
        })
        .await
    }

    /// Serializes a record and appends it to its own dataset.
    pub async fn append_record<R: Record>(&self, record: &R) -> Result<()> {
        let document = serde_json::to_value(record)?;
        self.append(R::DATASET, document).await
    }

    /// Returns the first document whose `attribute` equals `value`.
    ///
    /// A missing or empty dataset yields `None`.
    pub async fn find(
        &self,
        dataset: &str,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Document>> {
        let value = value.into();
        self.transaction(|tx| {
            tx.dataset(dataset).and_then(|documents| {
                documents
                    .iter()
                    .find(|document| document.get(attribute) == Some(&value))
                    .cloned()
            })
        })
        .await
    }

    /// Like [`find`](Self::find), but passes each stored string attribute
    /// through `normalizer` before comparing it with `value`.
    ///
    /// Documents whose attribute is missing or not a string never match.
    pub async fn find_by<N>(
        &self,
        dataset: &str,
        attribute: &str,
        value: &str,
        normalizer: N,
    ) -> Result<Option<Document>>
    where
        N: Fn(&str) -> String + Send + Sync,
    {
        self.transaction(|tx| {
            tx.dataset(dataset).and_then(|documents| {
                documents
                    .iter()
                    .find(|document| {
                        document
                            .get(attribute)
                            .and_then(Value::as_str)
                            .is_some_and(|stored| normalizer(stored) == value)
                    })
                    .cloned()
            })
        })
        .await
    }

    /// Typed variant of [`find`](Self::find) over a record's own dataset.
    pub async fn find_record<R: Record>(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<Option<R>> {
        match self.find(R::DATASET, attribute, value).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Returns every document in a dataset, in insertion order.
    pub async fn documents(&self, dataset: &str) -> Result<Vec<Document>> {
        self.transaction(|tx| tx.dataset(dataset).cloned().unwrap_or_default())
            .await
    }

    /// Mutates a record and persists it in place.
    ///
    /// The stored snapshot is located by its `id` attribute within the
    /// record's dataset. `mutator` runs against `record` first; the mutated record
    /// then replaces the located document at the same position. When no
    /// snapshot is found the dataset is left untouched and
    /// [`UpdateOutcome::Missing`] is returned, although `record` itself has
    /// still been mutated.
    pub async fn update_record<R, F>(&self, record: &mut R, mutator: F) -> Result<UpdateOutcome>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let id = serde_json::to_value(record.id())?;
        let dataset = R::DATASET;

        let outcome = self
            .transaction(|tx| -> Result<UpdateOutcome> {
                let position = tx.dataset(dataset).and_then(|documents| {
                    documents
                        .iter()
                        .position(|document| document.get("id") == Some(&id))
                });

                mutator(record);

                let Some(index) = position else {
                    return Ok(UpdateOutcome::Missing);
                };

                let updated = serde_json::to_value(&*record)?;
                let documents = tx.dataset_mut(dataset);
                documents.remove(index);
                documents.insert(index, updated);
                tx.commit();

                Ok(UpdateOutcome::Replaced)
            })
            .await??;

        if outcome == UpdateOutcome::Missing {
            tracing::warn!(dataset, id = %record.id(), "no stored snapshot for record, update dropped");
        }

        Ok(outcome)
    }
}
