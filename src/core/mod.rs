//! Core types: records, schemas, errors, tokens and the generic resource service

pub mod entity;
pub mod error;
pub mod events;
pub mod hooks;
pub mod query;
pub mod schema;
pub mod service;
pub mod store;
pub mod token;
pub mod validation;

pub use entity::{Document, Entity, Record};
pub use error::{SyndicationError, SyndicationResult};
pub use events::{EventBus, EventEnvelope, ResourceEvent, log_events};
pub use hooks::{NoHooks, ResourceHooks};
pub use query::{ListParams, PaginatedResponse, PaginationMeta};
pub use schema::{CollectionSchema, FieldSpec, FieldType, SortDirection, SortSpec};
pub use service::ResourceService;
pub use store::RecordStore;
pub use token::{OsTokenIssuer, TokenIssuer, generate_token};
