//! HTTP API handlers using axum.
//!
//! # Rust Learning Note
//!
//! This module is the transport binding: it turns HTTP requests into
//! registry calls and registry results back into HTTP responses. The
//! registry itself knows nothing about HTTP.
//!
//! | Route | Registry call |
//! |---|---|
//! | `POST /api/v1/contacts` | `upsert` |
//! | `GET /api/v1/contacts/{id}` | `get` |
//! | `GET /api/v1/contacts` | `list` (streamed as NDJSON) |
//! | `GET /api/v1/health` | none |
//!
//! ## Key axum Features
//!
//! 1. **Extractors**: Automatic parsing (Json, Path, State)
//! 2. **Rejections**: A malformed body or id never reaches a handler
//! 3. **Streaming bodies**: `Body::from_stream` sends records as they are encoded

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use contacts_common::{Contact, ContactId, Error, ErrorResponse, GetContactResponse};
use futures::stream;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::storage::ContactRegistry;

/// Content type of the streamed list response: one JSON document per line.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Creates the API router.
///
/// # Rust Learning Note
///
/// ## Dependency Injection
///
/// ```ignore
/// Router::new()
///     .route("/api/v1/contacts", post(upsert_handler).get(list_handler))
///     .with_state(registry)
/// ```
///
/// The registry is built by the caller and passed in. Handlers receive it
/// through the `State` extractor, so there is no global instance anywhere.
pub fn create_router(registry: Arc<ContactRegistry>) -> Router {
    Router::new()
        .route("/api/v1/contacts", post(upsert_handler).get(list_handler))
        .route("/api/v1/contacts/{id}", get(get_handler))
        .route("/api/v1/health", get(health_handler))
        .with_state(registry)
}

/// Inserts or updates a contact.
///
/// A body without `id` is an insert and the response carries the new id.
async fn upsert_handler(
    State(registry): State<Arc<ContactRegistry>>,
    Json(contact): Json<Contact>,
) -> Result<Json<Contact>, ApiError> {
    match contact.id {
        Some(id) => debug!("Upserting contact {}", id),
        None => debug!("Upserting new contact {} {}", contact.name, contact.surname),
    }

    let stored = registry.upsert(contact)?;
    Ok(Json(stored))
}

/// Looks up a single contact.
///
/// # Rust Learning Note
///
/// ## Absence as Data
///
/// A miss is still `200 OK`, with `{}` as the body. The lookup worked; it
/// just found nothing. A `404` here would look the same to a client as a
/// wrong URL.
async fn get_handler(
    State(registry): State<Arc<ContactRegistry>>,
    Path(id): Path<ContactId>,
) -> Json<GetContactResponse> {
    Json(GetContactResponse::from(registry.get(id)))
}

/// Streams every contact as newline-delimited JSON.
///
/// The snapshot is taken before the first byte is written, so a slow
/// reader never holds the registry lock.
async fn list_handler(State(registry): State<Arc<ContactRegistry>>) -> Response {
    let snapshot = registry.list();
    info!("Streaming {} contacts", snapshot.len());

    let lines = stream::iter(snapshot.map(encode_line));
    (
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(lines),
    )
        .into_response()
}

fn encode_line(contact: Contact) -> Result<Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(&contact)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

/// API error type.
///
/// # Rust Learning Note
///
/// ## Custom Error Responses
///
/// Implementing `IntoResponse` lets handlers return `Result<_, ApiError>`
/// and use `?` on registry calls. The `From<Error>` impl below picks the
/// status code.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            not_found @ Error::ContactNotFound { .. } => ApiError::NotFound(not_found.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status == StatusCode::NOT_FOUND {
            warn!("API error: {} - {}", status, message);
        } else {
            error!("API error: {} - {}", status, message);
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
