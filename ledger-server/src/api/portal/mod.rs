//! Customer Portal API 模块
//!
//! 客户令牌专用的只读入口，客户只能看到自己的账户。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_customer;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/portal",
        Router::new()
            .route("/data", get(handler::data))
            .route("/statement", get(handler::statement))
            .layer(middleware::from_fn(require_customer)),
    )
}
