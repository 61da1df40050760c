//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{customer, txn};
use crate::utils::{AppError, AppResult};
use shared::models::{Customer, CustomerCreate, CustomerStats, CustomerUpdate};

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// GET /api/customers - 获取所有客户，按序列号排序
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::find_all(state.get_pool()).await?;
    Ok(Json(customers))
}

/// GET /api/customers/search?query=xxx - 搜索客户（序列号/姓名/手机号）
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    if query.query.trim().is_empty() {
        return Err(AppError::invalid("Search parameter required"));
    }
    let customers = customer::search(state.get_pool(), &query.query).await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let customer = customer::find_by_id(state.get_pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {} not found", id)))?;
    Ok(Json(customer))
}

/// GET /api/customers/:id/stats - 客户交易统计
pub async fn stats(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerStats>> {
    customer::find_by_id(state.get_pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {} not found", id)))?;
    let stats = customer::stats(state.get_pool(), id).await?;
    Ok(Json(stats))
}

/// POST /api/customers - 创建客户
///
/// 序列号自动递增；门户初始密码为手机号本身。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_name_mobile(&payload.name, &payload.mobile)?;

    if customer::mobile_taken(state.get_pool(), payload.mobile.trim(), None).await? {
        return Err(AppError::conflict(
            "Customer with this mobile number already exists",
        ));
    }

    let customer = customer::create(state.get_pool(), payload).await?;
    tracing::info!(id = customer.id, serial = customer.serial_number, "Customer created");
    Ok(Json(customer))
}

/// PUT /api/customers/:id - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    validate_name_mobile(&payload.name, &payload.mobile)?;

    if customer::mobile_taken(state.get_pool(), payload.mobile.trim(), Some(id)).await? {
        return Err(AppError::conflict(
            "Customer with this mobile number already exists",
        ));
    }

    let customer = customer::update(state.get_pool(), id, payload).await?;
    Ok(Json(customer))
}

/// DELETE /api/customers/:id - 删除客户（仅 admin）
///
/// 有交易记录的客户不可删除。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let transaction_count = txn::count_by_customer(state.get_pool(), id).await?;
    if transaction_count > 0 {
        return Err(AppError::validation(
            "Cannot delete customer with existing transactions",
        ));
    }

    let deleted = customer::delete(state.get_pool(), id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Customer {} not found", id)));
    }
    tracing::info!(id, "Customer deleted");
    Ok(Json(true))
}

/// Name required, mobile exactly 10 digits
fn validate_name_mobile(name: &str, mobile: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || mobile.trim().is_empty() {
        return Err(AppError::invalid("Name and mobile are required"));
    }
    let mobile = mobile.trim();
    if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid("Mobile number must be 10 digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_must_be_ten_digits() {
        assert!(validate_name_mobile("A", "9876543210").is_ok());
        assert!(validate_name_mobile("A", "987654321").is_err());
        assert!(validate_name_mobile("A", "98765432100").is_err());
        assert!(validate_name_mobile("A", "987654321x").is_err());
        assert!(validate_name_mobile("", "9876543210").is_err());
    }
}
