//! Client-facing DTOs
//!
//! Request/response payloads for the auth endpoints, shared so in-process
//! test clients can reuse them.

use serde::{Deserialize, Serialize};

/// Staff login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Customer login request (serial number + password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerLoginRequest {
    pub serial_number: i64,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Authenticated principal information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// "admin" | "user" | "customer"
    pub role: String,
    /// Set for customer principals only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<i64>,
}
