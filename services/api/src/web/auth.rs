//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::core_error_response;
use crate::web::middleware::bearer_token;
use crate::web::state::AppState;
use hydration_core::domain::{DEFAULT_DAILY_GOAL_ML, MIN_DAILY_GOAL_ML};
use hydration_core::ports::CoreError;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Daily goal in milliliters; defaults to 2000 when omitted.
    pub daily_goal: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: Uuid,
    pub email: String,
    pub daily_goal: i32,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPayload,
}

#[derive(Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// Emails are matched case-insensitively, so they are stored lowercased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request or duplicate email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate the payload before it reaches the core
    let email = normalize_email(&req.email);
    if email.is_empty() || !email.contains('@') {
        return Err((StatusCode::BAD_REQUEST, "A valid email is required.".to_string()));
    }
    if req.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "A password is required.".to_string()));
    }
    let daily_goal = req.daily_goal.unwrap_or(DEFAULT_DAILY_GOAL_ML);
    if daily_goal < MIN_DAILY_GOAL_ML {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Daily goal must be at least {} ml.", MIN_DAILY_GOAL_ML),
        ));
    }

    // 2. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to hash password".to_string(),
            )
        })?
        .to_string();

    // 3. Create the user; a duplicate email surfaces as 400 from the store
    let user = state
        .store
        .create_user(&email, &password_hash, daily_goal)
        .await
        .map_err(|e| {
            error!("Failed to create user: {:?}", e);
            core_error_response(e)
        })?;

    // 4. Issue a bearer token for the new account
    let issued = state.authenticator.issue(user.id).await.map_err(|e| {
        error!("Failed to issue token: {:?}", e);
        core_error_response(e)
    })?;

    // 5. Return token and user info (excluding the password hash)
    let response = AuthResponse {
        token: issued.token,
        user: UserPayload {
            id: user.id,
            email: user.email,
            daily_goal: user.daily_goal_ml,
        },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // An unknown email and a wrong password answer identically, so the
    // response does not reveal which one was off.
    let invalid = || (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string());

    // 1. Get the stored credentials by email
    let creds = state
        .store
        .credentials_by_email(&normalize_email(&req.email))
        .await
        .map_err(|e| match e {
            CoreError::NotFound(_) => invalid(),
            other => {
                error!("Failed to load credentials: {:?}", other);
                core_error_response(other)
            }
        })?;

    // 2. Verify the password
    let parsed_hash = PasswordHash::new(&creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Authentication error".to_string(),
        )
    })?;
    if Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid());
    }

    // 3. Issue a fresh bearer token
    let issued = state.authenticator.issue(creds.user_id).await.map_err(|e| {
        error!("Failed to issue token: {:?}", e);
        core_error_response(e)
    })?;

    // 4. Return token and user info
    let response = AuthResponse {
        token: issued.token,
        user: UserPayload {
            id: creds.user_id,
            email: creds.email,
            daily_goal: creds.daily_goal_ml,
        },
    };
    Ok((StatusCode::OK, Json(response)))
}

/// POST /auth/logout - Revoke the presented token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = LogoutResponse),
        (status = 401, description = "No valid token presented")
    ),
    security(("bearer_token" = []))
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Extract the bearer token (the auth middleware already accepted it)
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or((StatusCode::UNAUTHORIZED, "No token presented.".to_string()))?;

    // 2. Revoke it so later requests are rejected
    state.authenticator.revoke(token).await.map_err(|e| {
        error!("Failed to revoke token: {:?}", e);
        core_error_response(e)
    })?;

    Ok((
        StatusCode::OK,
        Json(LogoutResponse {
            message: "Logged out.".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Anna@Example.COM "), "anna@example.com");
        assert_eq!(normalize_email("a@b.c"), "a@b.c");
    }
}
