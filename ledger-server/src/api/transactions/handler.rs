//! Transaction Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{customer, item, txn};
use crate::utils::{AppError, AppResult};
use shared::models::{Transaction, TransactionCreate, TransactionWithCustomer};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 最近交易条数，默认 5，上限 100
    pub limit: Option<i64>,
}

/// GET /api/transactions?limit=N - 最近交易（含客户信息）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TransactionWithCustomer>>> {
    let limit = query.limit.unwrap_or(5).clamp(1, 100);
    let transactions = txn::find_recent(state.get_pool(), limit).await?;
    Ok(Json(transactions))
}

/// GET /api/transactions/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TransactionWithCustomer>> {
    let transaction = txn::find_by_id_with_customer(state.get_pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Transaction {} not found", id)))?;
    Ok(Json(transaction))
}

/// POST /api/transactions - 记录一笔销售
///
/// 必须有商品行或预付款；金额和数量不得为负。目录行校验 item 存在，
/// 自定义行不校验。总额由服务端重新计算。
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TransactionCreate>,
) -> AppResult<Json<Transaction>> {
    customer::find_by_id(state.get_pool(), payload.customer_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Customer {} not found", payload.customer_id))
        })?;

    if payload.items.is_empty() && payload.advance_payment <= 0.0 {
        return Err(AppError::invalid(
            "Transaction requires items or an advance payment",
        ));
    }
    if payload.advance_payment < 0.0 {
        return Err(AppError::invalid("Advance payment cannot be negative"));
    }

    for line in &payload.items {
        if line.name.trim().is_empty() {
            return Err(AppError::invalid("Line item name is required"));
        }
        if line.price < 0.0 {
            return Err(AppError::invalid("Line item price cannot be negative"));
        }
        if line.quantity <= 0 {
            return Err(AppError::invalid(
                "Line item quantity must be greater than zero",
            ));
        }
        if !line.is_custom {
            let item_id = line
                .item_id
                .ok_or_else(|| AppError::invalid("Catalog line requires an item id"))?;
            item::find_by_id(state.get_pool(), item_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Item {} not found", item_id)))?;
        }
    }

    let transaction = txn::create(state.get_pool(), payload, current_user.id).await?;
    tracing::info!(
        id = transaction.id,
        customer_id = transaction.customer_id,
        total = transaction.total_amount,
        "Transaction recorded"
    );
    Ok(Json(transaction))
}
