//! Statement Report Handlers
//!
//! 同一份对账单数据的三种输出：JSON、PDF 下载、WhatsApp 文案 + wa.me 链接。

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{customer, txn};
use crate::statement::{self, StatementData, StatementTotals};
use crate::utils::time::{format_date_iso, parse_range_end, parse_range_start};
use crate::utils::{AppError, AppResult};
use shared::models::{Customer, Transaction};

#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    pub customer_id: i64,
    /// `yyyy-mm-dd` 或 RFC3339，缺省为账户起始
    pub from: Option<String>,
    /// 缺省为当前时刻
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatementResponse {
    pub business_name: String,
    pub customer: Customer,
    pub transactions: Vec<Transaction>,
    pub from: i64,
    pub to: i64,
    pub totals: StatementTotals,
}

#[derive(Debug, Serialize)]
pub struct WhatsAppResponse {
    pub message: String,
    pub link: String,
}

/// GET /api/reports/customer - 对账单 JSON
pub async fn customer_statement(
    State(state): State<ServerState>,
    Query(query): Query<StatementQuery>,
) -> AppResult<Json<StatementResponse>> {
    let data = load_statement(&state, &query).await?;
    Ok(Json(StatementResponse {
        business_name: data.business_name,
        customer: data.customer,
        transactions: data.transactions,
        from: data.from,
        to: data.to,
        totals: data.totals,
    }))
}

/// GET /api/reports/pdf - 对账单 PDF 下载
pub async fn pdf_statement(
    State(state): State<ServerState>,
    Query(query): Query<StatementQuery>,
) -> AppResult<Response> {
    let data = load_statement(&state, &query).await?;
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

/// POST /api/reports/whatsapp - 对账单文案和 wa.me 链接
pub async fn whatsapp_statement(
    State(state): State<ServerState>,
    Json(query): Json<StatementQuery>,
) -> AppResult<Json<WhatsAppResponse>> {
    let data = load_statement(&state, &query).await?;
    let message = statement::whatsapp::build_message(&data);
    let link = statement::whatsapp::build_link(&data.customer.mobile, &message);
    Ok(Json(WhatsAppResponse { message, link }))
}

/// Resolve the customer, the date range and the transactions inside it.
async fn load_statement(
    state: &ServerState,
    query: &StatementQuery,
) -> Result<StatementData, AppError> {
    let customer = customer::find_by_id(state.get_pool(), query.customer_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Customer {} not found", query.customer_id))
        })?;

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

    Ok(StatementData {
        business_name: state.config.business_name.clone(),
        customer,
        transactions,
        from,
        to,
        totals,
    })
}
