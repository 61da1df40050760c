//! Statement Reports API 模块 (仅 admin)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/reports",
        Router::new()
            .route("/customer", get(handler::customer_statement))
            .route("/pdf", get(handler::pdf_statement))
            .route("/whatsapp", post(handler::whatsapp_statement))
            .layer(middleware::from_fn(require_admin)),
    )
}
