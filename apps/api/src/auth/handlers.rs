use axum::{extract::State, http::StatusCode, Json};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::{create_user, find_by_email};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::PublicUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let email = req.email.trim();
    let username = req.username.trim();
    if !EmailAddress::is_valid(email) {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if username.is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }

    let hashed = hash_password(&req.password, state.config.bcrypt_cost).await?;
    let user = create_user(&state.db, email, username, &hashed).await?;
    info!(user_id = user.id, "Registered user {username}");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
///
/// Unknown email and wrong password are reported identically.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.hashed_password).await? {
        return Err(AppError::InvalidCredentials);
    }

    let access_token = state
        .tokens
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
