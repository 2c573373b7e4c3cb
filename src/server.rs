//! JSON HTTP server for the contact book.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST`   | `/contacts` | Create a contact (201) |
//! | `GET`    | `/contacts?page&limit` | List one page of contacts (200) |
//! | `PUT`    | `/contacts/{id}` | Replace a contact's fields (200) |
//! | `DELETE` | `/contacts/{id}` | Delete a contact (204) |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses carry a single human-readable message:
//!
//! ```json
//! { "error": "Email already registered." }
//! ```
//!
//! Validation and conflict errors are 400, unknown ids are 404, and storage
//! failures are 500 with a generic message (the cause is logged).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser front-end
//! can be served from a different origin.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db;
use crate::error::ServiceError;
use crate::migrate;
use crate::models::{Contact, ContactInput, ContactPage};
use crate::service::ContactService;
use crate::store::SqliteStore;
use crate::validate::validate_contact;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: ContactService,
}

/// Starts the HTTP server on `server.host:server.port`.
///
/// Opens the configured database, creates the schema if needed, and serves
/// until the process receives Ctrl-C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;

    let service = ContactService::new(Arc::new(SqliteStore::new(pool.clone())));
    let app = router(service);

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    Ok(())
}

/// Build the application router around a service.
pub fn router(service: ContactService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/contacts", get(handle_list).post(handle_create))
        .route("/contacts/{id}", put(handle_update).delete(handle_delete))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { service })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Storage(cause) => {
                tracing::error!(error = %cause, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        AppError {
            status,
            message: err.public_message(),
        }
    }
}

/// Unwrap a JSON body, reporting malformed payloads as validation errors.
///
/// A body sent without a JSON content type is treated as an empty object,
/// so it fails field validation like any other payload missing its fields.
fn body(payload: Result<Json<ContactInput>, JsonRejection>) -> Result<ContactInput, AppError> {
    match payload {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ContactInput::default()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            Err(ServiceError::Validation("Invalid request body.".to_string()).into())
        }
    }
}

/// Integer value of a path id. Whole-number decimal forms such as `5.0` or
/// `5e0` denote the same row as `5`; anything else cannot match a row.
fn id_value(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    let f: f64 = raw.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    id_value(raw).ok_or_else(|| ServiceError::NotFound.into())
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /contacts ============

/// Query string for `GET /contacts`. Values stay raw strings so that
/// unparseable input falls back to the defaults instead of being rejected.
#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<String>,
    limit: Option<String>,
}

async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ContactPage>, AppError> {
    let page = state
        .service
        .list(params.page.as_deref(), params.limit.as_deref())
        .await?;
    Ok(Json(page))
}

async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let input = body(payload)?;
    let contact = state.service.create(&input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<Json<Contact>, AppError> {
    let input = body(payload)?;
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(not_found) => {
            // Malformed input is reported ahead of an unknown id
            validate_contact(&input)?;
            return Err(not_found);
        }
    };
    let contact = state.service.update(id, &input).await?;
    Ok(Json(contact))
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
