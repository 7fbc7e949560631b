//! Catalog form handlers, registered once per `CatalogKind`
//!
//! POST /<kind>        store a flat field map
//! GET  /<kind>/ids    record keys for dependent-form dropdowns
//! GET  /<kind>/count  dashboard counter

use axum::{http::StatusCode, Json};
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::models::catalog::CountResponse;
use crate::models::common::{ErrorResponse, MessageResponse};
use crate::services::catalog::{CatalogError, CatalogKind};
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn submit_record(
    state: AppState,
    kind: CatalogKind,
    fields: Map<String, Value>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.catalog.submit(kind, fields).await.map_err(|e| {
        warn!(kind = kind.slug(), error = %e, "Catalog submission rejected");
        map_catalog_error(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: kind.success_message(),
        }),
    ))
}

pub async fn record_ids(state: AppState, kind: CatalogKind) -> Result<Json<Value>, ApiError> {
    let ids = state.catalog.ids(kind).await.map_err(map_catalog_error)?;

    let mut body = Map::new();
    body.insert(kind.ids_key(), Value::from(ids));
    Ok(Json(Value::Object(body)))
}

pub async fn record_count(state: AppState, kind: CatalogKind) -> Result<Json<CountResponse>, ApiError> {
    let count = state.catalog.count(kind).await.map_err(map_catalog_error)?;
    Ok(Json(CountResponse { count }))
}

/// Map CatalogError to HTTP response
pub fn map_catalog_error(err: CatalogError) -> ApiError {
    match err {
        CatalogError::MissingFields(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string(), "MISSING_FIELDS")),
        ),
        CatalogError::Duplicate { .. } => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(err.to_string(), "DUPLICATE_RECORD")),
        ),
        CatalogError::Database(ref e) => {
            error!(error = %e, "Catalog query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string(), "DATABASE_ERROR")),
            )
        }
    }
}
