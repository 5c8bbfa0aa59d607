//! Typed error handling for the syndication service
//!
//! Every failure raised by the token issuer, the record store or the resource
//! services is one of the categories below. Nothing is recovered locally: errors
//! propagate unchanged to the caller of the create/update/delete operation.
//!
//! # Error Categories
//!
//! - [`RecordError`]: record lookups and uniqueness conflicts
//! - [`ValidationError`]: schema validation of incoming documents
//! - [`TokenError`]: bearer token generation
//! - [`StorageError`]: record store internals
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RequestError`]: malformed HTTP requests
//!
//! # Example
//!
//! ```rust,ignore
//! match service.create_one(draft).await {
//!     Ok(link) => println!("created {}", link.id),
//!     Err(SyndicationError::Record(RecordError::DuplicateToken { .. })) => {
//!         println!("token already in use");
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the syndication service
#[derive(Debug, Error)]
pub enum SyndicationError {
    /// Record lookups and conflicts
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Schema validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Token generation errors
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Record store errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl SyndicationError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyndicationError::Record(e) => e.status_code(),
            SyndicationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SyndicationError::Token(_) => StatusCode::SERVICE_UNAVAILABLE,
            SyndicationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SyndicationError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SyndicationError::Request(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SyndicationError::Record(e) => e.error_code(),
            SyndicationError::Validation(_) => "VALIDATION_ERROR",
            SyndicationError::Token(e) => e.error_code(),
            SyndicationError::Storage(_) => "STORAGE_ERROR",
            SyndicationError::Config(_) => "CONFIG_ERROR",
            SyndicationError::Request(e) => e.error_code(),
        }
    }

    /// Whether this error is a uniqueness conflict on a bearer token
    pub fn is_duplicate_token(&self) -> bool {
        matches!(
            self,
            SyndicationError::Record(RecordError::DuplicateToken { .. })
        )
    }

    /// Whether this error reports a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyndicationError::Record(RecordError::NotFound { .. }))
    }

    /// Per-field validation failures, empty for any other error
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            SyndicationError::Validation(e) => e.field_errors(),
            _ => &[],
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            SyndicationError::Record(RecordError::NotFound { collection, id }) => {
                Some(serde_json::json!({
                    "collection": collection,
                    "id": id.to_string()
                }))
            }
            SyndicationError::Record(RecordError::DuplicateKey { collection, field })
            | SyndicationError::Record(RecordError::DuplicateToken { collection, field }) => {
                Some(serde_json::json!({
                    "collection": collection,
                    "field": field
                }))
            }
            SyndicationError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for SyndicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Record Errors
// =============================================================================

/// Errors related to record lookups and uniqueness
#[derive(Debug, Error)]
pub enum RecordError {
    /// No record with this id in the collection
    #[error("{collection} record with id '{id}' not found")]
    NotFound { collection: String, id: Uuid },

    /// A unique field already holds this value
    #[error("{collection} record with the same '{field}' already exists")]
    DuplicateKey { collection: String, field: String },

    /// A unique bearer token is already held by another record
    #[error("{field} is already assigned to another {collection} record")]
    DuplicateToken { collection: String, field: String },
}

impl RecordError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecordError::DuplicateKey { .. } => StatusCode::CONFLICT,
            RecordError::DuplicateToken { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RecordError::NotFound { .. } => "RECORD_NOT_FOUND",
            RecordError::DuplicateKey { .. } => "DUPLICATE_KEY",
            RecordError::DuplicateToken { .. } => "DUPLICATE_TOKEN",
        }
    }

    /// Report a unique-key conflict as a bearer token conflict
    pub fn into_duplicate_token(self) -> Self {
        match self {
            RecordError::DuplicateKey { collection, field } => {
                RecordError::DuplicateToken { collection, field }
            }
            other => other,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to document validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed schema validation
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// The payload is not a JSON object
    #[error("Expected a JSON object, got {found}")]
    NotAnObject { found: String },

    /// Invalid JSON
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Field errors carried by this error, if any
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::FieldErrors(errors) => errors,
            _ => &[],
        }
    }
}

// =============================================================================
// Token Errors
// =============================================================================

/// Errors raised while issuing bearer tokens
#[derive(Debug, Error)]
pub enum TokenError {
    /// The randomness source could not produce a value
    #[error("Randomness source unavailable: {message}")]
    RandomnessUnavailable { message: String },
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::RandomnessUnavailable { .. } => "RANDOMNESS_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the record store itself
#[derive(Debug, Error)]
pub enum StorageError {
    /// The collection was never registered with the store
    #[error("Unknown collection: {collection}")]
    UnknownCollection { collection: String },

    /// A lock guarding store state was poisoned
    #[error("Failed to acquire {kind} lock: {message}")]
    LockPoisoned { kind: &'static str, message: String },

    /// A stored document could not be converted to a record
    #[error("Failed to decode {collection} record: {message}")]
    Decode { collection: String, message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Record id in the path is not a UUID
    #[error("Invalid record ID format: '{id}'")]
    InvalidRecordId { id: String },

    /// Request body has the wrong shape
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Query string could not be parsed
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidRecordId { .. } => "INVALID_RECORD_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for SyndicationError {
    fn from(err: serde_json::Error) -> Self {
        SyndicationError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for SyndicationError {
    fn from(err: serde_yaml::Error) -> Self {
        SyndicationError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for SyndicationError {
    fn from(err: std::io::Error) -> Self {
        SyndicationError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for syndication operations
pub type SyndicationResult<T> = Result<T, SyndicationError>;
