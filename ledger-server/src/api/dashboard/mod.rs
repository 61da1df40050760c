//! Dashboard API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/dashboard",
        Router::new()
            .route("/stats", get(handler::stats))
            .layer(middleware::from_fn(require_staff)),
    )
}
