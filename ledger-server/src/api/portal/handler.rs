//! Customer Portal Handlers
//!
//! 身份来自客户令牌里的 customer id，请求参数里没有客户标识。

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{customer, txn};
use crate::statement::{self, StatementData};
use crate::utils::time::{format_date_iso, parse_range_end, parse_range_start};
use crate::utils::{AppError, AppResult};
use shared::models::{AccountSummary, Customer, Transaction};

#[derive(Debug, Serialize)]
pub struct PortalData {
    pub customer: Customer,
    pub transactions: Vec<Transaction>,
    pub summary: AccountSummary,
}

#[derive(Debug, Deserialize)]
pub struct PortalStatementQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/portal/data - 客户本人资料、全部交易和账户汇总
pub async fn data(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<PortalData>> {
    let customer = customer::find_by_id(state.get_pool(), current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer account not found"))?;

    let transactions = txn::find_by_customer(state.get_pool(), customer.id).await?;
    let summary = txn::account_summary(state.get_pool(), customer.id).await?;

    Ok(Json(PortalData {
        customer,
        transactions,
        summary,
    }))
}

/// GET /api/portal/statement?from=&to= - 客户本人的对账单 PDF
///
/// 缺省范围为账户全史。
pub async fn statement(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<PortalStatementQuery>,
) -> AppResult<Response> {
    let customer = customer::find_by_id(state.get_pool(), current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer account not found"))?;

    let from = match &query.from {
        Some(s) => parse_range_start(s)
            .ok_or_else(|| AppError::invalid(format!("Invalid 'from' date: {}", s)))?,
        None => 0,
    };
    let to = match &query.to {
        Some(s) => parse_range_end(s)
            .ok_or_else(|| AppError::invalid(format!("Invalid 'to' date: {}", s)))?,
        None => shared::util::now_millis(),
    };
    if from > to {
        return Err(AppError::invalid("'from' must not be after 'to'"));
    }

    let transactions =
        txn::find_by_customer_in_range(state.get_pool(), customer.id, from, to).await?;
    let totals = statement::summarize(&transactions);

    let data = StatementData {
        business_name: state.config.business_name.clone(),
        customer,
        transactions,
        from,
        to,
        totals,
    };

    let filename = format!(
        "statement-{}-{}.pdf",
        data.customer.serial_number,
        format_date_iso(data.from)
    );
    let bytes = statement::pdf::render(&data)
        .map_err(|e| AppError::internal(format!("PDF rendering failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
