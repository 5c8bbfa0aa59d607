//! Generic resource service
//!
//! A [`ResourceService`] binds a record type to a [`RecordStore`] collection.
//! Record-specific behavior is not subclassed: it is injected as a
//! [`ResourceHooks`] value, and record-specific helpers live in inherent impl
//! blocks next to each record type.

use crate::core::entity::{Document, Entity, Record, strip_metadata, to_document};
use crate::core::error::{RecordError, StorageError, SyndicationError, SyndicationResult};
use crate::core::events::{EventBus, ResourceEvent};
use crate::core::hooks::{NoHooks, ResourceHooks};
use crate::core::query::{ListParams, PaginatedResponse};
use crate::core::schema::CollectionSchema;
use crate::core::store::RecordStore;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Create/read/update/delete operations for one record type
pub struct ResourceService<T: Record> {
    store: Arc<dyn RecordStore>,
    hooks: Arc<dyn ResourceHooks>,
    event_bus: Option<EventBus>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            hooks: self.hooks.clone(),
            event_bus: self.event_bus.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> ResourceService<T> {
    /// Create a service over `store`, registering the record's collection
    pub fn new(store: Arc<dyn RecordStore>) -> SyndicationResult<Self> {
        store.register(T::schema())?;
        Ok(Self {
            store,
            hooks: Arc::new(NoHooks),
            event_bus: None,
            _record: PhantomData,
        })
    }

    /// Replace the lifecycle hooks
    pub fn with_hooks(mut self, hooks: Arc<dyn ResourceHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Publish mutation events on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn schema(&self) -> &'static CollectionSchema {
        T::schema()
    }

    /// Create a batch of records; nothing is stored unless every record is
    pub async fn create(&self, mut docs: Vec<Document>) -> SyndicationResult<Vec<T>> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }
        docs.iter_mut().for_each(strip_metadata);
        self.hooks.on_create(&mut docs)?;

        let created = self
            .store
            .create(T::collection_name(), docs)
            .await
            .map_err(|e| self.conflict(e))?;
        let records = created
            .into_iter()
            .map(T::from_document)
            .collect::<SyndicationResult<Vec<T>>>()?;

        tracing::info!(
            collection = T::collection_name(),
            count = records.len(),
            "records created"
        );
        self.publish(ResourceEvent::Created {
            resource: T::notification_key().to_string(),
            ids: records.iter().map(|r| r.id()).collect(),
        });
        Ok(records)
    }

    /// Create a single record from a serializable draft
    pub async fn create_one<D: Serialize + Sync>(&self, draft: &D) -> SyndicationResult<T> {
        let doc = to_document(draft)?;
        self.create(vec![doc]).await?.pop().ok_or_else(|| {
            StorageError::Decode {
                collection: T::collection_name().to_string(),
                message: "store returned no record".to_string(),
            }
            .into()
        })
    }

    pub async fn get(&self, id: &Uuid) -> SyndicationResult<T> {
        let doc = self.store.read(T::collection_name(), id).await?;
        T::from_document(doc)
    }

    /// One page of records, by default most recently updated first
    pub async fn list(&self, params: &ListParams) -> SyndicationResult<PaginatedResponse<T>> {
        let sort = params.sort_for(T::schema())?;
        let records = self
            .store
            .list(T::collection_name(), &sort)
            .await?
            .into_iter()
            .map(T::from_document)
            .collect::<SyndicationResult<Vec<T>>>()?;
        Ok(params.paginate(records))
    }

    /// The most recently updated record whose `field` equals `value`
    pub async fn find_one_by(&self, field: &str, value: impl Into<Value>) -> SyndicationResult<Option<T>> {
        let value = value.into();
        let found = self.store.find(T::collection_name(), field, &value).await?;
        found.into_iter().next().map(T::from_document).transpose()
    }

    /// Apply a partial update
    pub async fn update(&self, id: &Uuid, mut patch: Document) -> SyndicationResult<T> {
        strip_metadata(&mut patch);
        let original = self.store.read(T::collection_name(), id).await?;
        self.hooks.on_update(&mut patch, &original)?;

        let updated = self
            .store
            .update(T::collection_name(), id, patch)
            .await
            .map_err(|e| self.conflict(e))?;

        tracing::debug!(collection = T::collection_name(), %id, "record updated");
        self.publish(ResourceEvent::Updated {
            resource: T::notification_key().to_string(),
            id: *id,
        });
        T::from_document(updated)
    }

    /// Replace every field of a record
    pub async fn replace(&self, id: &Uuid, mut doc: Document) -> SyndicationResult<T> {
        strip_metadata(&mut doc);
        let original = self.store.read(T::collection_name(), id).await?;
        self.hooks.on_replace(&mut doc, &original)?;

        let replaced = self
            .store
            .replace(T::collection_name(), id, doc)
            .await
            .map_err(|e| self.conflict(e))?;

        tracing::debug!(collection = T::collection_name(), %id, "record replaced");
        self.publish(ResourceEvent::Replaced {
            resource: T::notification_key().to_string(),
            id: *id,
        });
        T::from_document(replaced)
    }

    pub async fn delete(&self, id: &Uuid) -> SyndicationResult<()> {
        self.store.delete(T::collection_name(), id).await?;

        tracing::debug!(collection = T::collection_name(), %id, "record deleted");
        self.publish(ResourceEvent::Deleted {
            resource: T::notification_key().to_string(),
            id: *id,
        });
        Ok(())
    }

    /// Report unique-key conflicts on credential fields as token conflicts
    fn conflict(&self, err: SyndicationError) -> SyndicationError {
        match err {
            SyndicationError::Record(RecordError::DuplicateKey { collection, field }) => {
                let credential = T::schema().field(&field).is_some_and(|f| f.credential);
                tracing::warn!(collection = %collection, field = %field, "unique value already in use");
                let err = RecordError::DuplicateKey { collection, field };
                if credential {
                    err.into_duplicate_token().into()
                } else {
                    err.into()
                }
            }
            other => other,
        }
    }

    fn publish(&self, event: ResourceEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}
