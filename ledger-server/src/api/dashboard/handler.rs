//! Dashboard Handler
//!
//! 首页看板聚合：客户/商品总数、今日交易数、本月营收、最近 10 笔交易。
//! 今日和本月的边界按 UTC 计算。

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{customer, item, txn};
use crate::utils::AppResult;
use crate::utils::time::{start_of_month_millis, start_of_today_millis};
use shared::models::TransactionWithCustomer;

const RECENT_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_customers: i64,
    pub total_items: i64,
    pub today_transactions: i64,
    pub monthly_revenue: f64,
    pub recent_transactions: Vec<TransactionWithCustomer>,
}

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let pool = state.get_pool();

    let total_customers = customer::count(pool).await?;
    let total_items = item::count(pool).await?;
    let today_transactions = txn::count_since(pool, start_of_today_millis()).await?;
    let monthly_revenue = txn::sum_total_since(pool, start_of_month_millis()).await?;
    let recent_transactions = txn::find_recent(pool, RECENT_LIMIT).await?;

    Ok(Json(DashboardStats {
        total_customers,
        total_items,
        today_transactions,
        monthly_revenue,
        recent_transactions,
    }))
}
