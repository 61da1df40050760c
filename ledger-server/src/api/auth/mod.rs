//! Auth API 模块
//!
//! `/api/auth/login` 和 `/api/auth/customer-login` 是公开路由
//! (认证中间件跳过)，`/api/auth/me` 要求任意有效令牌。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/customer-login", post(handler::customer_login))
        .route("/me", get(handler::me))
}
