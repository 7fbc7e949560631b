//! Requisition handlers
//!
//! POST  /requisitions?requester_id=..[&user_role=..]   create
//! GET   /requisitions?user_role=..&user_id=..          list visible
//! GET   /requisitions/{id}                              fetch one
//! PATCH /requisitions/{id}/{approve|decline}_l{2|3}?user_role=..&user_id=..

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::models::common::ErrorResponse;
use crate::models::requisition::{
    ActorQuery, CreateRequisitionQuery, CreateRequisitionRequest, RequisitionResponse, ReviewRequest, ReviewResponse,
};
use crate::services::auth::AuthError;
use crate::services::requisition_workflow::{
    authorize_review, resolve_requester_role, review_message, Actor, ApprovalLevel, Decision, WorkflowError,
};
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create requisition endpoint handler
///
/// A registered requester always acts with the role stored at signup;
/// `user_role` only applies to ids the user store does not know.
pub async fn create_requisition(
    State(state): State<AppState>,
    Query(query): Query<CreateRequisitionQuery>,
    Json(payload): Json<CreateRequisitionRequest>,
) -> Result<(StatusCode, Json<RequisitionResponse>), ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    info!(
        correlation_id = %correlation_id,
        requester_id = %query.requester_id,
        data_types = payload.data_types.len(),
        sl_no_rows = payload.sl_no_data.len(),
        "Requisition creation request received"
    );

    let registered = state.auth.role_of(&query.requester_id).await.map_err(|e| {
        error!(correlation_id = %correlation_id, error = %e, "Failed to resolve requester role");
        map_auth_lookup_error(e)
    })?;
    let role = resolve_requester_role(registered, query.user_role).map_err(|e| log_and_map(&correlation_id, e))?;

    let requester = Actor::new(query.requester_id, role);
    let stored = state
        .requisitions
        .create(payload, &requester)
        .await
        .map_err(|e| log_and_map(&correlation_id, e))?;

    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_requisitions(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<RequisitionResponse>>, ApiError> {
    let viewer = Actor::new(query.user_id, query.user_role);
    let rows = state.requisitions.list(&viewer).await.map_err(map_workflow_error)?;

    Ok(Json(rows.into_iter().map(RequisitionResponse::from).collect()))
}

pub async fn get_requisition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RequisitionResponse>, ApiError> {
    let requisition = state.requisitions.get_by_id(id).await.map_err(map_workflow_error)?;
    Ok(Json(requisition.into()))
}

pub async fn approve_l2(
    state: State<AppState>,
    id: Path<i32>,
    query: Query<ActorQuery>,
    body: Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    review(state, id, query, body, ApprovalLevel::L2, Decision::Approve).await
}

pub async fn decline_l2(
    state: State<AppState>,
    id: Path<i32>,
    query: Query<ActorQuery>,
    body: Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    review(state, id, query, body, ApprovalLevel::L2, Decision::Decline).await
}

pub async fn approve_l3(
    state: State<AppState>,
    id: Path<i32>,
    query: Query<ActorQuery>,
    body: Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    review(state, id, query, body, ApprovalLevel::L3, Decision::Approve).await
}

pub async fn decline_l3(
    state: State<AppState>,
    id: Path<i32>,
    query: Query<ActorQuery>,
    body: Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    review(state, id, query, body, ApprovalLevel::L3, Decision::Decline).await
}

async fn review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ActorQuery>,
    Json(payload): Json<ReviewRequest>,
    level: ApprovalLevel,
    decision: Decision,
) -> Result<Json<ReviewResponse>, ApiError> {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    info!(
        correlation_id = %correlation_id,
        requisition_id = id,
        user_id = %query.user_id,
        user_role = ?query.user_role,
        level = level.number(),
        decision = ?decision,
        "Requisition review request received"
    );

    let approver = Actor::new(query.user_id, query.user_role);
    authorize_review(level, decision, &approver).map_err(|e| log_and_map(&correlation_id, e))?;

    if let Some(approver_id) = payload.approver_id.as_deref() {
        if approver_id != approver.id {
            return Err(log_and_map(
                &correlation_id,
                WorkflowError::Validation("approver_id does not match the authenticated user_id".to_string()),
            ));
        }
    }

    let updated = state
        .requisitions
        .review(id, level, decision, &approver, payload.comments)
        .await
        .map_err(|e| log_and_map(&correlation_id, e))?;

    Ok(Json(ReviewResponse {
        message: review_message(level, decision),
        requisition: updated.into(),
    }))
}

fn log_and_map(correlation_id: &str, err: WorkflowError) -> ApiError {
    match &err {
        WorkflowError::Database(e) => error!(correlation_id = %correlation_id, error = %e, "Requisition request failed"),
        other => warn!(correlation_id = %correlation_id, error = %other, "Requisition request rejected"),
    }
    map_workflow_error(err)
}

/// Map WorkflowError to HTTP response
pub fn map_workflow_error(err: WorkflowError) -> ApiError {
    match err {
        WorkflowError::Validation(msg) => (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg, "VALIDATION_ERROR"))),
        WorkflowError::Authorization(msg) => (StatusCode::FORBIDDEN, Json(ErrorResponse::new(msg, "NOT_AUTHORIZED"))),
        WorkflowError::State(msg) => (StatusCode::CONFLICT, Json(ErrorResponse::new(msg, "INVALID_STATE"))),
        WorkflowError::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorResponse::new(msg, "NOT_FOUND"))),
        WorkflowError::Database(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Database error: {}", e), "DATABASE_ERROR")),
        ),
    }
}

fn map_auth_lookup_error(err: AuthError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(err.to_string(), "DATABASE_ERROR")),
    )
}
