//! Generic HTTP handlers over a [`ResourceService`]
//!
//! Each handler is instantiated per record type by
//! [`RecordDescriptor`](crate::server::registry::RecordDescriptor). Failures
//! render through `SyndicationError`'s `IntoResponse`, so every error body has
//! the `{code, message, details}` shape.

use crate::core::entity::{Record, into_document};
use crate::core::error::{RequestError, SyndicationResult};
use crate::core::query::{ListParams, PaginatedResponse};
use crate::core::service::ResourceService;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;
use uuid::Uuid;

fn parse_id(id: &str) -> SyndicationResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| {
        RequestError::InvalidRecordId {
            id: id.to_string(),
        }
        .into()
    })
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> SyndicationResult<Value> {
    body.map(|Json(value)| value).map_err(|e| {
        RequestError::InvalidBody {
            message: e.body_text(),
        }
        .into()
    })
}

/// `GET /{collection}`
pub async fn list_records<T: Record>(
    State(service): State<ResourceService<T>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> SyndicationResult<Json<PaginatedResponse<T>>> {
    let Query(params) = params.map_err(|e| RequestError::InvalidQuery {
        message: e.body_text(),
    })?;
    Ok(Json(service.list(&params).await?))
}

/// `POST /{collection}` with one object, or a non-empty array of objects for a batch
pub async fn create_records<T: Record>(
    State(service): State<ResourceService<T>>,
    body: Result<Json<Value>, JsonRejection>,
) -> SyndicationResult<Response> {
    match json_body(body)? {
        Value::Array(items) if items.is_empty() => Err(RequestError::InvalidBody {
            message: "batch must contain at least one record".to_string(),
        }
        .into()),
        Value::Array(items) => {
            let docs = items
                .into_iter()
                .map(into_document)
                .collect::<SyndicationResult<Vec<_>>>()?;
            let created = service.create(docs).await?;
            Ok((StatusCode::CREATED, Json(created)).into_response())
        }
        value => {
            let doc = into_document(value)?;
            let mut created = service.create(vec![doc]).await?;
            match created.pop() {
                Some(record) => Ok((StatusCode::CREATED, Json(record)).into_response()),
                None => Ok(StatusCode::NO_CONTENT.into_response()),
            }
        }
    }
}

/// `GET /{collection}/{id}`
pub async fn get_record<T: Record>(
    State(service): State<ResourceService<T>>,
    Path(id): Path<String>,
) -> SyndicationResult<Json<T>> {
    let id = parse_id(&id)?;
    Ok(Json(service.get(&id).await?))
}

/// `PATCH /{collection}/{id}`
pub async fn update_record<T: Record>(
    State(service): State<ResourceService<T>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> SyndicationResult<Json<T>> {
    let id = parse_id(&id)?;
    let patch = into_document(json_body(body)?)?;
    Ok(Json(service.update(&id, patch).await?))
}

/// `PUT /{collection}/{id}`
pub async fn replace_record<T: Record>(
    State(service): State<ResourceService<T>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> SyndicationResult<Json<T>> {
    let id = parse_id(&id)?;
    let doc = into_document(json_body(body)?)?;
    Ok(Json(service.replace(&id, doc).await?))
}

/// `DELETE /{collection}/{id}`
pub async fn delete_record<T: Record>(
    State(service): State<ResourceService<T>>,
    Path(id): Path<String>,
) -> SyndicationResult<StatusCode> {
    let id = parse_id(&id)?;
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
