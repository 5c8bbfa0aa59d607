//! Inbound syndication links
//!
//! A remote producer delivering content into a local blog. The producer
//! already issued the bearer token, so it is stored as supplied: no creation
//! hook runs and the store rejects a missing, empty or reused `blog_token`.

use crate::core::error::SyndicationResult;
use crate::core::schema::{CollectionSchema, DEFAULT_SORT, FieldSpec};
use crate::core::service::ResourceService;
use crate::core::store::RecordStore;
use crate::impl_record;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Field holding the producer-issued bearer token
pub const BLOG_TOKEN: &str = "blog_token";

pub static SYNDICATION_IN_SCHEMA: CollectionSchema = CollectionSchema {
    name: "syndication_in",
    fields: &[
        FieldSpec::id("blog_id").required(),
        FieldSpec::string(BLOG_TOKEN)
            .required()
            .unique()
            .non_empty()
            .credential(),
        FieldSpec::id("producer_id").required(),
        FieldSpec::id("producer_blog_id").required(),
    ],
    default_sort: DEFAULT_SORT,
};

impl_record!(
    /// A stored inbound syndication link
    SyndicationIn,
    SYNDICATION_IN_SCHEMA,
    {
        /// Local blog receiving the content
        blog_id: Uuid,
        /// Token the producer issued for this link
        blog_token: String,
        /// Remote producer organization
        producer_id: Uuid,
        /// Producer-side blog the content comes from
        producer_blog_id: Uuid,
    }
);

/// Draft of an inbound link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSyndicationIn {
    pub blog_id: Uuid,
    pub blog_token: String,
    pub producer_id: Uuid,
    pub producer_blog_id: Uuid,
}

/// Service managing inbound links
pub type SyndicationInService = ResourceService<SyndicationIn>;

pub fn syndication_in_service(store: Arc<dyn RecordStore>) -> SyndicationResult<SyndicationInService> {
    ResourceService::new(store)
}

impl ResourceService<SyndicationIn> {
    /// Inbound link a producer authenticates to with `blog_token`
    pub async fn find_by_blog_token(&self, blog_token: &str) -> SyndicationResult<Option<SyndicationIn>> {
        if blog_token.is_empty() {
            return Ok(None);
        }
        self.find_one_by(BLOG_TOKEN, blog_token).await
    }
}
