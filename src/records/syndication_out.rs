//! Outbound syndication links
//!
//! A local blog delivering its content to a remote consumer's blog. The
//! consumer authenticates with a bearer token issued here: when a create
//! request does not carry one, [`AssignToken`] generates it before the record
//! reaches the store.

use crate::core::entity::Document;
use crate::core::error::SyndicationResult;
use crate::core::hooks::ResourceHooks;
use crate::core::schema::{CollectionSchema, DEFAULT_SORT, FieldSpec};
use crate::core::service::ResourceService;
use crate::core::store::RecordStore;
use crate::core::token::TokenIssuer;
use crate::impl_record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Field holding the consumer's bearer token
pub const TOKEN: &str = "token";

/// Field advanced by the delivery process
pub const LAST_DELIVERED_POST_ID: &str = "last_delivered_post_id";

pub static SYNDICATION_OUT_SCHEMA: CollectionSchema = CollectionSchema {
    name: "syndication_out",
    fields: &[
        FieldSpec::id("blog_id").required(),
        FieldSpec::id("consumer_id").required(),
        FieldSpec::id("consumer_blog_id").required(),
        FieldSpec::id(LAST_DELIVERED_POST_ID).nullable(),
        FieldSpec::string(TOKEN)
            .required()
            .unique()
            .non_empty()
            .credential(),
    ],
    default_sort: DEFAULT_SORT,
};

impl_record!(
    /// A stored outbound syndication link
    SyndicationOut,
    SYNDICATION_OUT_SCHEMA,
    {
        /// Local blog being syndicated
        blog_id: Uuid,
        /// Remote consumer organization
        consumer_id: Uuid,
        /// Consumer-side blog receiving the content
        consumer_blog_id: Uuid,
        /// Most recently delivered post, if any
        #[serde(default)]
        last_delivered_post_id: Option<Uuid>,
        /// Bearer token the consumer pulls updates with
        token: String,
    }
);

/// Draft of an outbound link, as submitted by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSyndicationOut {
    pub blog_id: Uuid,
    pub consumer_id: Uuid,
    pub consumer_blog_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_delivered_post_id: Option<Uuid>,
    /// Generated on creation when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl NewSyndicationOut {
    pub fn new(blog_id: Uuid, consumer_id: Uuid, consumer_blog_id: Uuid) -> Self {
        Self {
            blog_id,
            consumer_id,
            consumer_blog_id,
            last_delivered_post_id: None,
            token: None,
        }
    }

    /// Use a caller-chosen token instead of a generated one
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Creation hook assigning a fresh token to every draft that lacks one
///
/// A draft lacks a token when the field is absent, null or the empty string.
/// Drafts carrying a token keep it. If the issuer fails, the whole batch is
/// rejected.
pub struct AssignToken {
    issuer: Arc<dyn TokenIssuer>,
}

impl AssignToken {
    pub fn new(issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { issuer }
    }
}

fn has_token(doc: &Document) -> bool {
    match doc.get(TOKEN) {
        None | Some(Value::Null) => false,
        Some(Value::String(token)) => !token.is_empty(),
        // wrong type: left for schema validation to report
        Some(_) => true,
    }
}

impl ResourceHooks for AssignToken {
    fn on_create(&self, docs: &mut [Document]) -> SyndicationResult<()> {
        let mut generated = 0;
        for doc in docs.iter_mut() {
            if !has_token(doc) {
                let token = self.issuer.generate_token()?;
                doc.insert(TOKEN.to_string(), Value::String(token));
                generated += 1;
            }
        }
        tracing::debug!(batch = docs.len(), generated, "outbound tokens assigned");
        Ok(())
    }

    fn on_replace(&self, doc: &mut Document, original: &Document) -> SyndicationResult<()> {
        if !has_token(doc)
            && let Some(token) = original.get(TOKEN)
        {
            doc.insert(TOKEN.to_string(), token.clone());
        }
        Ok(())
    }
}

/// Service managing outbound links
pub type SyndicationOutService = ResourceService<SyndicationOut>;

/// Build the outbound service, issuing missing tokens with `issuer`
pub fn syndication_out_service(
    store: Arc<dyn RecordStore>,
    issuer: Arc<dyn TokenIssuer>,
) -> SyndicationResult<SyndicationOutService> {
    Ok(ResourceService::new(store)?.with_hooks(Arc::new(AssignToken::new(issuer))))
}

impl ResourceService<SyndicationOut> {
    /// Outbound link authenticated by `token`
    pub async fn find_by_token(&self, token: &str) -> SyndicationResult<Option<SyndicationOut>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.find_one_by(TOKEN, token).await
    }

    /// Record `post_id` as the last post delivered over this link
    pub async fn mark_delivered(&self, id: &Uuid, post_id: Uuid) -> SyndicationResult<SyndicationOut> {
        let mut patch = Document::new();
        patch.insert(
            LAST_DELIVERED_POST_ID.to_string(),
            Value::String(post_id.to_string()),
        );
        self.update(id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TokenError;
    use serde_json::json;

    struct FixedIssuer;

    impl TokenIssuer for FixedIssuer {
        fn generate_token(&self) -> Result<String, TokenError> {
            Ok("generated".to_string())
        }
    }

    struct BrokenIssuer;

    impl TokenIssuer for BrokenIssuer {
        fn generate_token(&self) -> Result<String, TokenError> {
            Err(TokenError::RandomnessUnavailable {
                message: "no entropy".to_string(),
            })
        }
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_tokens_are_assigned() {
        let hook = AssignToken::new(Arc::new(FixedIssuer));
        let mut docs = vec![
            doc(json!({})),
            doc(json!({ "token": null })),
            doc(json!({ "token": "" })),
        ];
        hook.on_create(&mut docs).unwrap();
        assert!(docs.iter().all(|d| d[TOKEN] == "generated"));
    }

    #[test]
    fn test_present_tokens_are_kept() {
        let hook = AssignToken::new(Arc::new(FixedIssuer));
        let mut docs = vec![doc(json!({ "token": "mine" })), doc(json!({ "token": 7 }))];
        hook.on_create(&mut docs).unwrap();
        assert_eq!(docs[0][TOKEN], "mine");
        assert_eq!(docs[1][TOKEN], 7);
    }

    #[test]
    fn test_issuer_failure_aborts() {
        let hook = AssignToken::new(Arc::new(BrokenIssuer));
        let mut docs = vec![doc(json!({ "token": "mine" })), doc(json!({}))];
        let err = hook.on_create(&mut docs).unwrap_err();
        assert_eq!(err.error_code(), "RANDOMNESS_UNAVAILABLE");
    }

    #[test]
    fn test_replace_keeps_stored_token() {
        let hook = AssignToken::new(Arc::new(BrokenIssuer));
        let original = doc(json!({ "token": "stored" }));

        let mut replacement = doc(json!({}));
        hook.on_replace(&mut replacement, &original).unwrap();
        assert_eq!(replacement[TOKEN], "stored");

        let mut replacement = doc(json!({ "token": "rotated" }));
        hook.on_replace(&mut replacement, &original).unwrap();
        assert_eq!(replacement[TOKEN], "rotated");
    }

    #[test]
    fn test_draft_omits_absent_token() {
        let draft = NewSyndicationOut::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get(TOKEN).is_none());
        assert!(value.get(LAST_DELIVERED_POST_ID).is_none());

        let value = serde_json::to_value(draft.with_token("abc")).unwrap();
        assert_eq!(value[TOKEN], "abc");
    }
}
