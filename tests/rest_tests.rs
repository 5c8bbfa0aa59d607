//! End-to-end tests of the REST exposure
//!
//! Every test drives the router built by `ServerBuilder` through
//! `axum_test::TestServer`.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use syndication::prelude::*;

fn create_test_server() -> TestServer {
    let app = ServerBuilder::new().build().expect("Failed to build app");
    TestServer::new(app).expect("Failed to create test server")
}

fn outbound_body() -> Value {
    json!({
        "blog_id": Uuid::new_v4(),
        "consumer_id": Uuid::new_v4(),
        "consumer_blog_id": Uuid::new_v4(),
    })
}

fn inbound_body(blog_token: &str) -> Value {
    json!({
        "blog_id": Uuid::new_v4(),
        "blog_token": blog_token,
        "producer_id": Uuid::new_v4(),
        "producer_blog_id": Uuid::new_v4(),
    })
}

async fn create(server: &TestServer, path: &str, body: &Value) -> Value {
    let response = server.post(path).json(body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

// =============================================================================
// Health Check Tests
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoints() {
        let server = create_test_server();

        for path in ["/health", "/healthz"] {
            let response = server.get(path).await;
            response.assert_status_ok();

            let body: Value = response.json();
            assert_eq!(body["status"], "ok");
            assert_eq!(body["service"], "liveblog-syndication");
            assert_eq!(body["resources"], json!(["syndication_out", "syndication_in"]));
        }
    }
}

// =============================================================================
// Outbound Link Tests
// =============================================================================

mod outbound_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_generates_token() {
        let server = create_test_server();
        let body = create(&server, "/syndication_out", &outbound_body()).await;

        let token = body["token"].as_str().unwrap();
        assert_eq!(token.len(), 40);
        assert!(body["id"].as_str().is_some());
        assert_eq!(body["last_delivered_post_id"], Value::Null);
        assert_eq!(body["created_at"], body["updated_at"]);
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_token() {
        let server = create_test_server();
        let mut draft = outbound_body();
        draft["token"] = json!("chosen");

        let body = create(&server, "/syndication_out", &draft).await;
        assert_eq!(body["token"], "chosen");
    }

    #[tokio::test]
    async fn test_batch_create() {
        let server = create_test_server();
        let response = server
            .post("/syndication_out")
            .json(&json!([outbound_body(), outbound_body()]))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Vec<Value> = response.json();
        assert_eq!(body.len(), 2);
        assert_ne!(body[0]["token"], body[1]["token"]);
    }

    #[tokio::test]
    async fn test_duplicate_token_conflicts() {
        let server = create_test_server();
        let mut draft = outbound_body();
        draft["token"] = json!("taken");
        create(&server, "/syndication_out", &draft).await;

        let response = server.post("/syndication_out").json(&draft).await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["code"], "DUPLICATE_TOKEN");
        assert_eq!(body["details"]["field"], "token");
        assert_eq!(body["details"]["collection"], "syndication_out");
    }

    #[tokio::test]
    async fn test_patch_last_delivered_post() {
        let server = create_test_server();
        let created = create(&server, "/syndication_out", &outbound_body()).await;
        let id = created["id"].as_str().unwrap();
        let post_id = Uuid::new_v4();

        let response = server
            .patch(&format!("/syndication_out/{}", id))
            .json(&json!({ "last_delivered_post_id": post_id }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["last_delivered_post_id"], post_id.to_string());
        assert_eq!(body["token"], created["token"]);
    }

    #[tokio::test]
    async fn test_put_keeps_token() {
        let server = create_test_server();
        let created = create(&server, "/syndication_out", &outbound_body()).await;
        let id = created["id"].as_str().unwrap();

        let response = server
            .put(&format!("/syndication_out/{}", id))
            .json(&outbound_body())
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["token"], created["token"]);
        assert_ne!(body["blog_id"], created["blog_id"]);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let server = create_test_server();
        let created = create(&server, "/syndication_out", &outbound_body()).await;
        let path = format!("/syndication_out/{}", created["id"].as_str().unwrap());

        let response = server.get(&path).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), created);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
        server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Inbound Link Tests
// =============================================================================

mod inbound_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_inbound() {
        let server = create_test_server();
        let body = create(&server, "/syndication_in", &inbound_body("producer")).await;
        assert_eq!(body["blog_token"], "producer");
    }

    #[tokio::test]
    async fn test_missing_token_is_unprocessable() {
        let server = create_test_server();
        let mut draft = inbound_body("x");
        draft.as_object_mut().unwrap().remove("blog_token");

        let response = server.post("/syndication_in").json(&draft).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["fields"][0]["field"], "blog_token");

        let list: Value = server.get("/syndication_in").await.json();
        assert_eq!(list["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn test_duplicate_token_conflicts() {
        let server = create_test_server();
        create(&server, "/syndication_in", &inbound_body("dup")).await;

        let response = server
            .post("/syndication_in")
            .json(&inbound_body("dup"))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["code"], "DUPLICATE_TOKEN");
    }
}

// =============================================================================
// Listing Tests
// =============================================================================

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_empty() {
        let server = create_test_server();

        let response = server.get("/syndication_out").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["pagination"]["total"], 0);
        assert_eq!(body["pagination"]["page"], 1);
    }

    #[tokio::test]
    async fn test_list_pagination_and_order() {
        let server = create_test_server();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let created = create(&server, "/syndication_out", &outbound_body()).await;
            ids.push(created["id"].clone());
        }

        let body: Value = server.get("/syndication_out?limit=2").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["id"], ids[2]);
        assert_eq!(body["pagination"]["total_pages"], 2);
        assert_eq!(body["pagination"]["has_next"], true);

        let body: Value = server
            .get("/syndication_out?page=2&limit=2&sort=created_at:asc")
            .await
            .json();
        assert_eq!(body["data"][0]["id"], ids[2]);
    }

    #[tokio::test]
    async fn test_page_far_past_the_end() {
        let server = create_test_server();
        create(&server, "/syndication_out", &outbound_body()).await;

        let response = server
            .get(&format!("/syndication_out?page={}", usize::MAX))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_unknown_sort_field() {
        let server = create_test_server();
        let response = server.get("/syndication_out?sort=color").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["details"]["fields"][0]["field"], "sort");
    }

    #[tokio::test]
    async fn test_malformed_query() {
        let server = create_test_server();
        let response = server.get("/syndication_out?page=first").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_QUERY");
    }
}

// =============================================================================
// Request Error Tests
// =============================================================================

mod request_error_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_id() {
        let server = create_test_server();
        let response = server.get("/syndication_out/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_RECORD_ID");
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let server = create_test_server();
        let response = server
            .get(&format!("/syndication_in/{}", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_body_is_not_json() {
        let server = create_test_server();
        let response = server.post("/syndication_out").text("{ not json").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let server = create_test_server();
        let response = server.post("/syndication_in").json(&json!([])).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_body_is_not_an_object() {
        let server = create_test_server();
        let response = server.post("/syndication_out").json(&json!(42)).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_wrong_field_type() {
        let server = create_test_server();
        let mut draft = outbound_body();
        draft["consumer_id"] = json!(7);

        let response = server.post("/syndication_out").json(&draft).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<Value>()["details"]["fields"][0]["field"],
            "consumer_id"
        );
    }
}
