//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the health
//! checks, the routes of every registered resource and any custom routes.

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - `/health` and `/healthz`
    /// - CRUD routes for every registered resource
    /// - Custom routes
    ///
    /// Every request is traced.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let collections: Vec<String> = host.collections().into_iter().map(String::from).collect();

        let mut app = Self::health_routes(collections).merge(host.registry.build_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(TraceLayer::new_for_http())
    }

    fn health_routes(collections: Vec<String>) -> Router {
        let body = Arc::new(json!({
            "status": "ok",
            "service": "liveblog-syndication",
            "resources": collections,
        }));
        let health = move || {
            let body = body.clone();
            async move { Self::health_check(&body) }
        };

        Router::new()
            .route("/health", get(health.clone()))
            .route("/healthz", get(health))
    }

    /// Health check endpoint handler
    fn health_check(body: &Value) -> Json<Value> {
        Json(body.clone())
    }
}
