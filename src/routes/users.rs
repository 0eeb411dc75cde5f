use axum::extract::State;
use axum::routing::{get, put};
use axum::Router;

use chrono::Utc;
use serde::Deserialize;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::routes::auth::UserProfile;
use crate::state::AppState;
use crate::validation::{validate_password, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile).put(update_profile))
        .route("/me/password", put(change_password))
}

async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let user = state
        .store()
        .get_user_by_id(&auth.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(UserProfile::from(&user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    username: Option<String>,
}

async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut user = state
        .store()
        .get_user_by_id(&auth.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Some(username) = req.username {
        let trimmed = username.trim();
        if let Err(msg) = validate_username(trimmed) {
            return Err(AppError::bad_request("USER_INVALID_USERNAME", msg));
        }
        user.username = trimmed.to_string();
    }

    user.updated_at = Utc::now();
    state.store().update_user(&user)?;

    Ok(ok(UserProfile::from(&user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if let Err(msg) = validate_password(&req.new_password) {
        return Err(AppError::bad_request("AUTH_WEAK_PASSWORD", msg));
    }

    let mut user = state
        .store()
        .get_user_by_id(&auth.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if !verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::unauthorized("Current password is incorrect"));
    }

    user.password_hash = hash_password(&req.new_password)?;
    user.updated_at = Utc::now();
    state.store().update_user(&user)?;
    // Changing the password invalidates every open session.
    let _ = state.store().delete_user_auth_sessions(&auth.user_id)?;

    Ok(ok(serde_json::json!({ "passwordChanged": true })))
}
