//! User signup/login backed by the users table
//!
//! Passwords are stored as Argon2id PHC strings. The `(user_type, cpf_no)`
//! pair returned by login is the `(role, id)` the requisition workflow uses.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};
use tracing::{info, warn};

use crate::entities::prelude::Users;
use crate::entities::users::{self, Role};
use crate::models::user::{LoginRequest, LoginResponse, SignupRequest};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User with this ID (CPF No.) already exists.")]
    Conflict,
    #[error("Incorrect ID or password.")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AuthError {
    /// A unique-index hit on insert is a concurrent duplicate signup
    fn from_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::Conflict,
            _ => AuthError::Database(err),
        }
    }
}

/// Treat blank strings as missing
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a user. All of name, cpf_no, password and user_type are required.
    pub async fn signup(&self, request: SignupRequest) -> Result<users::Model, AuthError> {
        let (Some(name), Some(cpf_no), Some(password), Some(user_type)) = (
            present(&request.name),
            present(&request.cpf_no),
            present(&request.password),
            present(&request.user_type),
        ) else {
            return Err(AuthError::Validation(
                "All fields (name, ID, password, user type) are required.".to_string(),
            ));
        };

        // Passwords are hashed as typed, only the presence check trims
        let password = request.password.as_deref().unwrap_or(password);

        let role: Role = user_type.parse().map_err(|_| {
            AuthError::Validation(format!(
                "Invalid user type provided. Allowed types: {}",
                Role::labels().join(", ")
            ))
        })?;

        let existing = Users::find()
            .filter(users::Column::CpfNo.eq(cpf_no))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(AuthError::Conflict);
        }

        let user = users::ActiveModel {
            name: Set(name.to_string()),
            cpf_no: Set(cpf_no.to_string()),
            password_hash: Set(hash_password(password)?),
            user_type: Set(role),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let stored = user.insert(&self.db).await.map_err(AuthError::from_insert)?;
        info!(cpf_no = %stored.cpf_no, role = ?stored.user_type, "User registered");

        Ok(stored)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let (Some(cpf_no), Some(password)) = (present(&request.cpf_no), present(&request.password)) else {
            return Err(AuthError::Validation("ID (CPF No.) and password are required.".to_string()));
        };

        let password = request.password.as_deref().unwrap_or(password);

        let user = self.find_by_cpf_no(cpf_no).await?.ok_or_else(|| {
            warn!(cpf_no = %cpf_no, "Login failed: unknown user");
            AuthError::InvalidCredentials
        })?;

        if !verify_password(password, &user.password_hash) {
            warn!(cpf_no = %cpf_no, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(cpf_no = %cpf_no, role = ?user.user_type, "Login successful");

        Ok(LoginResponse {
            message: "Login successful!".to_string(),
            user_type: user.user_type,
            name: user.name,
            id: user.cpf_no,
        })
    }

    pub async fn find_by_cpf_no(&self, cpf_no: &str) -> Result<Option<users::Model>, AuthError> {
        Ok(Users::find()
            .filter(users::Column::CpfNo.eq(cpf_no))
            .one(&self.db)
            .await?)
    }

    /// Role registered for `cpf_no`, if the user exists
    pub async fn role_of(&self, cpf_no: &str) -> Result<Option<Role>, AuthError> {
        Ok(self.find_by_cpf_no(cpf_no).await?.map(|user| user.user_type))
    }
}
