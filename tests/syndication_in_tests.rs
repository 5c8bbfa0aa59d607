//! Integration tests for inbound syndication links
//!
//! Inbound tokens are issued by the producer, so a missing token is a
//! validation failure rather than something to generate.

use serde_json::{Value, json};
use syndication::core::query::ListParams;
use syndication::prelude::*;

fn service() -> SyndicationInService {
    syndication_in_service(Arc::new(InMemoryRecordStore::new())).unwrap()
}

fn draft(blog_token: &str) -> NewSyndicationIn {
    NewSyndicationIn {
        blog_id: Uuid::new_v4(),
        blog_token: blog_token.to_string(),
        producer_id: Uuid::new_v4(),
        producer_blog_id: Uuid::new_v4(),
    }
}

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

async fn count(service: &SyndicationInService) -> usize {
    service
        .list(&ListParams::default())
        .await
        .unwrap()
        .pagination
        .total
}

// =============================================================================
// Creation
// =============================================================================

mod creation {
    use super::*;

    #[tokio::test]
    async fn test_token_is_stored_as_supplied() {
        let service = service();
        let link = service.create_one(&draft("producer-issued")).await.unwrap();

        assert_eq!(link.blog_token, "producer-issued");
        assert_eq!(link.created_at, link.updated_at);
    }

    #[tokio::test]
    async fn test_missing_token_is_a_validation_error() {
        let service = service();
        let mut body = doc(serde_json::to_value(draft("x")).unwrap());
        body.remove("blog_token");

        let err = service.create(vec![body]).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.field_errors()[0].field, "blog_token");
        assert_eq!(count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_null_and_empty_tokens_are_rejected() {
        let service = service();
        for token in [Value::Null, json!("")] {
            let mut body = doc(serde_json::to_value(draft("x")).unwrap());
            body.insert("blog_token".to_string(), token);

            let err = service.create(vec![body]).await.unwrap_err();
            assert_eq!(err.error_code(), "VALIDATION_ERROR");
        }
        assert_eq!(count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_one_invalid_item_rejects_the_batch() {
        let service = service();
        let good = doc(serde_json::to_value(draft("good")).unwrap());
        let mut bad = doc(serde_json::to_value(draft("bad")).unwrap());
        bad.insert("producer_id".to_string(), json!("not-a-uuid"));

        let err = service.create(vec![good, bad]).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_fields_are_rejected() {
        let service = service();
        let mut body = doc(serde_json::to_value(draft("t")).unwrap());
        body.insert("auto_publish".to_string(), json!(true));

        let err = service.create(vec![body]).await.unwrap_err();
        assert_eq!(err.field_errors()[0].field, "auto_publish");
    }

    #[tokio::test]
    async fn test_metadata_in_drafts_is_ignored() {
        let service = service();
        let forged = Uuid::new_v4();
        let mut body = doc(serde_json::to_value(draft("t")).unwrap());
        body.insert("id".to_string(), json!(forged.to_string()));
        body.insert("created_at".to_string(), json!("2001-01-01T00:00:00Z"));

        let link = service.create(vec![body]).await.unwrap().remove(0);
        assert_ne!(link.id, forged);
        assert!(link.created_at.timestamp() > 978_307_200);
    }
}

// =============================================================================
// Uniqueness
// =============================================================================

mod uniqueness {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_token_keeps_original() {
        let service = service();
        let original = service.create_one(&draft("shared")).await.unwrap();

        let err = service.create_one(&draft("shared")).await.unwrap_err();
        assert!(err.is_duplicate_token());
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);

        assert_eq!(service.get(&original.id).await.unwrap(), original);
        assert_eq!(count(&service).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_with_same_token() {
        let service = service();

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create_one(&draft("same")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(err.is_duplicate_token(), "{err}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_same_token_allowed_across_resources() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let inbound = syndication_in_service(store.clone()).unwrap();
        let outbound = syndication_out_service(store, Arc::new(OsTokenIssuer::new())).unwrap();

        inbound.create_one(&draft("same-secret")).await.unwrap();
        let out = outbound
            .create_one(
                &NewSyndicationOut::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
                    .with_token("same-secret"),
            )
            .await
            .unwrap();
        assert_eq!(out.token, "same-secret");
    }

    #[tokio::test]
    async fn test_find_by_blog_token() {
        let service = service();
        let link = service.create_one(&draft("lookup")).await.unwrap();

        let found = service.find_by_blog_token("lookup").await.unwrap();
        assert_eq!(found, Some(link));
        assert!(service.find_by_blog_token("other").await.unwrap().is_none());
        assert!(service.find_by_blog_token("").await.unwrap().is_none());
    }
}

// =============================================================================
// Updates
// =============================================================================

mod updates {
    use super::*;

    #[tokio::test]
    async fn test_token_can_be_rotated() {
        let service = service();
        let link = service.create_one(&draft("old")).await.unwrap();

        let updated = service
            .update(&link.id, doc(json!({ "blog_token": "new" })))
            .await
            .unwrap();
        assert_eq!(updated.blog_token, "new");
        assert!(service.find_by_blog_token("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_requires_the_token() {
        let service = service();
        let link = service.create_one(&draft("kept")).await.unwrap();

        let mut body = doc(serde_json::to_value(draft("x")).unwrap());
        body.remove("blog_token");
        let err = service.replace(&link.id, body).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(service.get(&link.id).await.unwrap().blog_token, "kept");
    }

    #[tokio::test]
    async fn test_replace_on_missing_record() {
        let service = service();
        let body = doc(serde_json::to_value(draft("x")).unwrap());
        let err = service.replace(&Uuid::new_v4(), body).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
