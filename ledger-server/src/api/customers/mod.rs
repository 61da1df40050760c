//! Customer API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    // 员工路由：admin 和 user 均可
    let staff_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/stats", get(handler::stats))
        .layer(middleware::from_fn(require_staff));

    // 删除仅 admin
    let admin_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
