use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use modelgraph_storage::{ID_KEY, ListQuery, ModelStore, Record, StorageError, record_id};
use papaya::HashMap as PapayaHashMap;
use serde_json::Value;
use tracing::{debug, trace};

pub type StorageKey = String; // Format: "Model/id"

pub(crate) fn make_storage_key(model: &str, id: &str) -> StorageKey {
    format!("{model}/{id}")
}

/// A record plus the bookkeeping needed for stable list order.
#[derive(Debug, Clone)]
pub(crate) struct StoredRecord {
    pub(crate) model: String,
    pub(crate) seq: u64,
    pub(crate) data: Record,
}

/// In-memory model store using papaya lock-free HashMap.
///
/// Records are listed in insertion order, so offset-based cursors stay
/// stable as long as nothing before them is deleted.
#[derive(Debug)]
pub struct InMemoryStore {
    data: Arc<PapayaHashMap<StorageKey, StoredRecord>>,
    /// Insertion counter; also orders list results.
    seq_counter: AtomicU64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            seq_counter: AtomicU64::new(1),
        }
    }

    /// Creates a store pre-populated from `{"Model": [record, ...], ...}`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRecord` if the document is not shaped
    /// like that, or if two records share an id.
    pub fn from_seed(seed: &Value) -> Result<Self, StorageError> {
        let store = Self::new();
        let models = seed
            .as_object()
            .ok_or_else(|| StorageError::invalid_record("seed must be an object keyed by model name"))?;

        for (model, records) in models {
            let records = records.as_array().ok_or_else(|| {
                StorageError::invalid_record(format!("seed for {model} must be an array"))
            })?;
            for record in records {
                let record = record.as_object().cloned().ok_or_else(|| {
                    StorageError::invalid_record(format!("seed entry for {model} must be an object"))
                })?;
                store.insert(model, record)?;
            }
        }

        debug!(records = store.len(), "Seeded in-memory store");
        Ok(store)
    }

    /// Returns the total number of stored records across all models.
    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_seq(&self) -> u64 {
        self.seq_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Inserts a record, assigning a fresh `_id` when it has none.
    fn insert(&self, model: &str, mut record: Record) -> Result<Record, StorageError> {
        let id = match record_id(&record) {
            Some(id) => id,
            None => uuid::Uuid::new_v4().simple().to_string(),
        };
        record.insert(ID_KEY.to_string(), Value::String(id.clone()));

        let key = make_storage_key(model, &id);
        let stored = StoredRecord {
            model: model.to_string(),
            seq: self.next_seq(),
            data: record.clone(),
        };
        if self.data.pin().try_insert(key, stored).is_err() {
            return Err(StorageError::already_exists(model, id));
        }
        trace!(model = %model, id = %id, "Inserted record");
        Ok(record)
    }

    /// Collects the records of a model that satisfy the query, in insertion order.
    fn matching(&self, model: &str, query: &ListQuery) -> Vec<StoredRecord> {
        let guard = self.data.pin();
        let mut records: Vec<StoredRecord> = guard
            .iter()
            .filter(|(_, stored)| stored.model == model && query.matches(&stored.data))
            .map(|(_, stored)| stored.clone())
            .collect();
        records.sort_by_key(|stored| stored.seq);
        records
    }
}

#[async_trait]
impl ModelStore for InMemoryStore {
    async fn fetch_one(&self, model: &str, id: &str) -> Result<Option<Record>, StorageError> {
        let key = make_storage_key(model, id);
        let guard = self.data.pin();
        Ok(guard.get(&key).map(|stored| stored.data.clone()))
    }

    async fn fetch_list(&self, model: &str, query: &ListQuery) -> Result<Vec<Record>, StorageError> {
        let records = self
            .matching(model, query)
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|stored| stored.data)
            .collect();
        Ok(records)
    }

    async fn count(&self, model: &str, query: &ListQuery) -> Result<usize, StorageError> {
        Ok(self.matching(model, query).len())
    }

    async fn add_one(&self, model: &str, input: Record) -> Result<Record, StorageError> {
        self.insert(model, input)
    }

    async fn update_one(&self, model: &str, id: &str, input: Record) -> Result<Record, StorageError> {
        let key = make_storage_key(model, id);
        let guard = self.data.pin();

        // The merge runs against whatever is current and may be retried; a
        // concurrent delete leaves nothing to update.
        let updated = guard
            .update(key, |stored| {
                let mut merged = stored.clone();
                for (field, value) in &input {
                    if field != ID_KEY {
                        merged.data.insert(field.clone(), value.clone());
                    }
                }
                merged
            })
            .map(|stored| stored.data.clone())
            .ok_or_else(|| StorageError::not_found(model, id))?;
        trace!(model = %model, id = %id, "Updated record");
        Ok(updated)
    }

    async fn delete_one(&self, model: &str, id: &str) -> Result<bool, StorageError> {
        let key = make_storage_key(model, id);
        let guard = self.data.pin();
        let removed = guard.remove(&key).is_some();
        trace!(model = %model, id = %id, removed, "Deleted record");
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
