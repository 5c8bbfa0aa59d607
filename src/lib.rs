//! # Liveblog Syndication
//!
//! Outbound and inbound syndication links between live blogs.
//!
//! - **Outbound links** (`syndication_out`): a local blog delivering its content
//!   to a remote consumer's blog. The consumer pulls updates with a bearer token
//!   generated here when the creator does not supply one.
//! - **Inbound links** (`syndication_in`): a remote producer delivering content
//!   into a local blog, authenticated by the token the producer issued.
//!
//! Both resources are served by one generic [`ResourceService`](core::ResourceService)
//! over a [`RecordStore`](core::RecordStore) that enforces the declared schemas:
//! required fields, types, nullability and unique tokens.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use syndication::prelude::*;
//!
//! let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
//! let outbound = syndication_out_service(store.clone(), Arc::new(OsTokenIssuer::new()))?;
//!
//! let link = outbound
//!     .create_one(&NewSyndicationOut::new(blog_id, consumer_id, consumer_blog_id))
//!     .await?;
//! assert_eq!(link.token.len(), 40);
//!
//! // Or expose both resources over HTTP
//! ServerBuilder::new().serve("127.0.0.1:3000").await?;
//! ```

pub mod config;
pub mod core;
pub mod records;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Document, Entity, EventBus, EventEnvelope, ListParams, NoHooks, OsTokenIssuer,
        PaginatedResponse, RecordStore, Record, ResourceEvent, ResourceHooks, ResourceService,
        SyndicationError, SyndicationResult, TokenIssuer, generate_token, log_events,
        schema::{CollectionSchema, DEFAULT_SORT, FieldSpec, SortSpec},
    };

    // === Macros ===
    pub use crate::impl_record;

    // === Records ===
    pub use crate::records::{
        AssignToken, NewSyndicationIn, NewSyndicationOut, SyndicationIn, SyndicationInService,
        SyndicationOut, SyndicationOutService, syndication_in_service, syndication_out_service,
    };

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;

    // === Config ===
    pub use crate::config::{SyndicationConfig, init_tracing};

    // === Server ===
    pub use crate::server::{ResourceDescriptor, ResourceRegistry, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
