use serde::{Deserialize, Serialize};

use crate::entities::users::Role;

/// POST /users/signup body. Fields are optional so that a missing one is a
/// 400 with a readable message rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cpf_no: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Role wire string, checked against the known roles
    #[serde(default)]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub cpf_no: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_type: Role,
    pub name: String,
    /// The cpf_no; used as requester/approver id by the workflow
    pub id: String,
}
