//! Authentication Handlers
//!
//! Staff login, customer login and current-principal lookup.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{customer, staff};
use crate::utils::AppError;

use shared::client::{CustomerLoginRequest, LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - staff login
///
/// Verifies credentials and returns a staff JWT. Failures are collapsed
/// into one message so usernames cannot be enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid("Username and password are required"));
    }

    let account = staff::find_by_username(state.get_pool(), &req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(a) => a,
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!(username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_staff_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        id = account.id,
        username = %account.username,
        role = %account.role,
        "Staff logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: account.id,
            username: account.username,
            name: account.name,
            role: account.role,
            serial_number: None,
        },
    }))
}

/// POST /api/auth/customer-login - customer login by serial number
pub async fn customer_login(
    State(state): State<ServerState>,
    Json(req): Json<CustomerLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.password.is_empty() {
        return Err(AppError::invalid("Serial number and password are required"));
    }

    let account = customer::find_by_serial(state.get_pool(), req.serial_number).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(c) => c,
        None => {
            tracing::warn!(serial = req.serial_number, "Customer login failed - not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!(serial = req.serial_number, "Customer login failed - bad password");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_customer_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        id = account.id,
        serial = account.serial_number,
        "Customer logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: account.id,
            username: account.serial_number.to_string(),
            name: account.name,
            role: "customer".to_string(),
            serial_number: Some(account.serial_number),
        },
    }))
}

/// GET /api/auth/me - current principal info (staff or customer)
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    if user.is_customer() {
        let account = customer::find_by_id(state.get_pool(), user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer account no longer exists"))?;
        return Ok(Json(UserInfo {
            id: account.id,
            username: account.serial_number.to_string(),
            name: account.name,
            role: "customer".to_string(),
            serial_number: Some(account.serial_number),
        }));
    }

    let account = staff::find_by_id(state.get_pool(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff account no longer exists"))?;
    Ok(Json(UserInfo {
        id: account.id,
        username: account.username,
        name: account.name,
        role: account.role,
        serial_number: None,
    }))
}
