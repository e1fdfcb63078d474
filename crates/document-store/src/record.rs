use common::RecordId;
use serde::{Serialize, de::DeserializeOwned};

/// A typed document that lives in exactly one dataset.
///
/// Two records are the same record when they share a dataset and an id;
/// this is how [`DataStore::update_record`](crate::DataStore::update_record)
/// finds the stored snapshot to replace.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the dataset holding records of this type.
    const DATASET: &'static str;

    /// Returns the record's id.
    fn id(&self) -> &RecordId;
}

/// Result of [`DataStore::update_record`](crate::DataStore::update_record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The stored snapshot was replaced with the mutated record.
    Replaced,

    /// No stored snapshot matched; nothing was persisted.
    Missing,
}

impl UpdateOutcome {
    /// Returns true if the record was persisted.
    pub fn is_replaced(&self) -> bool {
        matches!(self, UpdateOutcome::Replaced)
    }
}
