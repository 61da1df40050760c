//! Item Catalog API 模块

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<ServerState> {
    // 员工路由：仅读取
    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_staff));

    // 管理路由：创建（multipart 带图片）、启用/停用、删除
    //
    // axum 默认 2MB 请求体上限会先于图片大小校验触发，这里放宽到
    // 图片上限之上（留 1MB 给 multipart 头和文本字段）。
    let admin_routes = Router::new()
        .route(
            "/",
            post(handler::create)
                .layer(DefaultBodyLimit::max(handler::MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .route(
            "/{id}",
            axum::routing::patch(handler::set_active).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
