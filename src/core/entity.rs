//! Record traits and the document representation used at the store boundary

use crate::core::error::{StorageError, SyndicationResult, ValidationError};
use crate::core::schema::CollectionSchema;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

/// A schemaless JSON object, as exchanged with the record store
pub type Document = Map<String, Value>;

/// Store-managed identifier field
pub const ID: &str = "id";

/// Store-managed creation timestamp field
pub const CREATED_AT: &str = "created_at";

/// Store-managed modification timestamp field
pub const UPDATED_AT: &str = "updated_at";

/// Fields owned by the store; callers cannot set them
pub const META_FIELDS: [&str; 3] = [ID, CREATED_AT, UPDATED_AT];

/// Base trait for all stored records.
///
/// Every record carries:
/// - id: Unique identifier assigned by the store
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
pub trait Entity: Clone + Send + Sync + 'static {
    /// Collection holding records of this type (e.g., "syndication_out")
    fn collection_name() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Trait for records backed by a declared collection schema.
///
/// Records are decoded from the documents the store returns, so every
/// record type is also serde-serializable.
pub trait Record: Entity + Serialize + DeserializeOwned {
    /// Schema of the backing collection
    fn schema() -> &'static CollectionSchema;

    /// Name under which mutation notifications are published
    fn notification_key() -> &'static str {
        Self::collection_name()
    }

    /// Decode a stored document
    fn from_document(doc: Document) -> SyndicationResult<Self> {
        serde_json::from_value(Value::Object(doc)).map_err(|e| {
            StorageError::Decode {
                collection: Self::collection_name().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Serialize a draft (or any serializable value) into a document
pub fn to_document<T: Serialize>(value: &T) -> SyndicationResult<Document> {
    into_document(serde_json::to_value(value)?)
}

/// Unwrap a JSON value that must be an object
pub fn into_document(value: Value) -> SyndicationResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::NotAnObject {
            found: json_kind(&other).to_string(),
        }
        .into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Remove store-managed fields from a caller-supplied document
pub fn strip_metadata(doc: &mut Document) {
    for field in META_FIELDS {
        doc.remove(field);
    }
}
