//! In-memory implementation of RecordStore for testing and development

use crate::core::entity::{CREATED_AT, Document, ID, UPDATED_AT, strip_metadata};
use crate::core::error::{RecordError, StorageError, SyndicationResult};
use crate::core::schema::{CollectionSchema, SortDirection, SortSpec, ValidationMode};
use crate::core::store::RecordStore;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredRecord {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    body: Document,
}

impl StoredRecord {
    fn to_document(&self) -> Document {
        let mut doc = self.body.clone();
        doc.insert(ID.to_string(), Value::String(self.id.to_string()));
        doc.insert(CREATED_AT.to_string(), timestamp(&self.created_at));
        doc.insert(UPDATED_AT.to_string(), timestamp(&self.updated_at));
        doc
    }
}

fn timestamp(at: &DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[derive(Debug)]
struct Collection {
    schema: &'static CollectionSchema,
    // insertion order is kept for tie-breaking
    records: IndexMap<Uuid, StoredRecord>,
}

impl Collection {
    fn not_found(&self, id: &Uuid) -> RecordError {
        RecordError::NotFound {
            collection: self.schema.name.to_string(),
            id: *id,
        }
    }

    /// Fail if a unique field of `doc` is already held by another record
    fn check_unique(&self, doc: &Document, exclude: Option<&Uuid>) -> SyndicationResult<()> {
        for spec in self.schema.unique_fields() {
            let Some(value) = doc.get(spec.name).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = self
                .records
                .values()
                .any(|r| Some(&r.id) != exclude && r.body.get(spec.name) == Some(value));
            if taken {
                return Err(self.duplicate(spec.name).into());
            }
        }
        Ok(())
    }

    /// Fail if two documents of one batch share a unique value
    fn check_batch_unique(&self, docs: &[Document]) -> SyndicationResult<()> {
        for spec in self.schema.unique_fields() {
            for (i, doc) in docs.iter().enumerate() {
                let Some(value) = doc.get(spec.name).filter(|v| !v.is_null()) else {
                    continue;
                };
                if docs[..i].iter().any(|other| other.get(spec.name) == Some(value)) {
                    return Err(self.duplicate(spec.name).into());
                }
            }
        }
        Ok(())
    }

    fn duplicate(&self, field: &str) -> RecordError {
        RecordError::DuplicateKey {
            collection: self.schema.name.to_string(),
            field: field.to_string(),
        }
    }
}

/// Records in the requested order, most recent insertion first on ties
fn sorted<'a>(
    records: impl DoubleEndedIterator<Item = &'a StoredRecord>,
    sort: &SortSpec,
) -> Vec<Document> {
    let mut records: Vec<&StoredRecord> = records.rev().collect();
    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort.field);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    records.into_iter().map(StoredRecord::to_document).collect()
}

fn compare_by(a: &StoredRecord, b: &StoredRecord, field: &str) -> Ordering {
    match field {
        ID => a.id.cmp(&b.id),
        CREATED_AT => a.created_at.cmp(&b.created_at),
        UPDATED_AT => a.updated_at.cmp(&b.updated_at),
        _ => {
            let a = a.body.get(field).and_then(Value::as_str);
            let b = b.body.get(field).and_then(Value::as_str);
            a.cmp(&b)
        }
    }
}

/// In-memory record store
///
/// Collections live in one map behind a `RwLock`; every write holds the
/// write lock for the whole check-and-insert, so uniqueness checks and batch
/// inserts are atomic.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_lock(&self) -> SyndicationResult<RwLockReadGuard<'_, HashMap<String, Collection>>> {
        self.collections.read().map_err(|e| {
            StorageError::LockPoisoned {
                kind: "read",
                message: e.to_string(),
            }
            .into()
        })
    }

    fn write_lock(&self) -> SyndicationResult<RwLockWriteGuard<'_, HashMap<String, Collection>>> {
        self.collections.write().map_err(|e| {
            StorageError::LockPoisoned {
                kind: "write",
                message: e.to_string(),
            }
            .into()
        })
    }
}

fn unknown(collection: &str) -> StorageError {
    StorageError::UnknownCollection {
        collection: collection.to_string(),
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn register(&self, schema: &'static CollectionSchema) -> SyndicationResult<()> {
        let mut collections = self.write_lock()?;
        collections
            .entry(schema.name.to_string())
            .or_insert_with(|| Collection {
                schema,
                records: IndexMap::new(),
            });
        Ok(())
    }

    async fn create(&self, collection: &str, mut docs: Vec<Document>) -> SyndicationResult<Vec<Document>> {
        let mut collections = self.write_lock()?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        for doc in docs.iter_mut() {
            strip_metadata(doc);
            coll.schema.validate(doc, ValidationMode::Full)?;
            coll.check_unique(doc, None)?;
        }
        coll.check_batch_unique(&docs)?;

        let now = Utc::now();
        let created: Vec<Document> = docs
            .into_iter()
            .map(|body| {
                let record = StoredRecord {
                    id: Uuid::new_v4(),
                    created_at: now,
                    updated_at: now,
                    body,
                };
                let doc = record.to_document();
                coll.records.insert(record.id, record);
                doc
            })
            .collect();

        tracing::debug!(collection, count = created.len(), "records created");
        Ok(created)
    }

    async fn read(&self, collection: &str, id: &Uuid) -> SyndicationResult<Document> {
        let collections = self.read_lock()?;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        coll.records
            .get(id)
            .map(StoredRecord::to_document)
            .ok_or_else(|| coll.not_found(id).into())
    }

    async fn list(&self, collection: &str, sort: &SortSpec) -> SyndicationResult<Vec<Document>> {
        let collections = self.read_lock()?;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        Ok(sorted(coll.records.values(), sort))
    }

    async fn find(&self, collection: &str, field: &str, value: &Value) -> SyndicationResult<Vec<Document>> {
        let collections = self.read_lock()?;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        let matching: Vec<&StoredRecord> = coll
            .records
            .values()
            .filter(|r| r.body.get(field) == Some(value))
            .collect();
        Ok(sorted(matching.into_iter(), &coll.schema.default_sort))
    }

    async fn update(&self, collection: &str, id: &Uuid, mut patch: Document) -> SyndicationResult<Document> {
        let mut collections = self.write_lock()?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        strip_metadata(&mut patch);
        coll.schema.validate(&patch, ValidationMode::Patch)?;

        let mut merged = coll
            .records
            .get(id)
            .ok_or_else(|| coll.not_found(id))?
            .body
            .clone();
        merged.extend(patch);
        coll.check_unique(&merged, Some(id))?;

        let record = coll
            .records
            .get_mut(id)
            .ok_or_else(|| RecordError::NotFound {
                collection: collection.to_string(),
                id: *id,
            })?;
        record.body = merged;
        record.updated_at = Utc::now();

        tracing::debug!(collection, %id, "record updated");
        Ok(record.to_document())
    }

    async fn replace(&self, collection: &str, id: &Uuid, mut doc: Document) -> SyndicationResult<Document> {
        let mut collections = self.write_lock()?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        if !coll.records.contains_key(id) {
            return Err(coll.not_found(id).into());
        }

        strip_metadata(&mut doc);
        coll.schema.validate(&doc, ValidationMode::Full)?;
        coll.check_unique(&doc, Some(id))?;

        let record = coll
            .records
            .get_mut(id)
            .ok_or_else(|| RecordError::NotFound {
                collection: collection.to_string(),
                id: *id,
            })?;
        record.body = doc;
        record.updated_at = Utc::now();

        tracing::debug!(collection, %id, "record replaced");
        Ok(record.to_document())
    }

    async fn delete(&self, collection: &str, id: &Uuid) -> SyndicationResult<()> {
        let mut collections = self.write_lock()?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        match coll.records.shift_remove(id) {
            Some(_) => {
                tracing::debug!(collection, %id, "record deleted");
                Ok(())
            }
            None => Err(coll.not_found(id).into()),
        }
    }
}
