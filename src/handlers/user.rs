//! Signup/login handlers
//!
//! POST /users/signup {name, cpf_no, password, user_type}
//! POST /users/login  {cpf_no, password}

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::models::common::{ErrorResponse, MessageResponse};
use crate::models::user::{LoginRequest, LoginResponse, SignupRequest};
use crate::services::auth::AuthError;
use crate::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ErrorResponse>)> {
    state.auth.signup(payload).await.map_err(map_auth_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully!".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let response = state.auth.login(payload).await.map_err(map_auth_error)?;
    Ok(Json(response))
}

/// Map AuthError to HTTP response
fn map_auth_error(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        AuthError::Conflict => (StatusCode::CONFLICT, "USER_EXISTS"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        AuthError::PasswordHash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        AuthError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "User request failed");
    }

    (status, Json(ErrorResponse::new(err.to_string(), code)))
}
