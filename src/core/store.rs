//! Record store contract
//!
//! The store is a generic collaborator: it knows nothing about syndication.
//! It validates documents against the registered [`CollectionSchema`], enforces
//! uniqueness on fields declared `unique` and applies default ordering.
//!
//! Documents returned by the store always carry the metadata fields `id`,
//! `created_at` and `updated_at`.

use crate::core::entity::Document;
use crate::core::error::SyndicationResult;
use crate::core::schema::{CollectionSchema, SortSpec};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Generic create/read/update/delete store over named collections
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Declare a collection; registering the same schema twice is a no-op
    fn register(&self, schema: &'static CollectionSchema) -> SyndicationResult<()>;

    /// Validate and insert a batch; either every document is stored or none is
    ///
    /// Fails with `ValidationError` or `DuplicateKey`.
    async fn create(&self, collection: &str, docs: Vec<Document>) -> SyndicationResult<Vec<Document>>;

    /// Read one record; fails with `NotFound`
    async fn read(&self, collection: &str, id: &Uuid) -> SyndicationResult<Document>;

    /// All records of a collection in the given order
    async fn list(&self, collection: &str, sort: &SortSpec) -> SyndicationResult<Vec<Document>>;

    /// Records whose `field` equals `value`, most recently updated first
    async fn find(&self, collection: &str, field: &str, value: &Value) -> SyndicationResult<Vec<Document>>;

    /// Merge a partial document into an existing record
    async fn update(&self, collection: &str, id: &Uuid, patch: Document) -> SyndicationResult<Document>;

    /// Replace every field of an existing record, keeping its id and creation time
    async fn replace(&self, collection: &str, id: &Uuid, doc: Document) -> SyndicationResult<Document>;

    /// Remove a record; fails with `NotFound`
    async fn delete(&self, collection: &str, id: &Uuid) -> SyndicationResult<()>;
}
