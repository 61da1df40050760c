//! Transaction Repository
//!
//! Header rows live in `txn`, line items in `txn_item`. Totals are computed
//! here, not taken from the caller: `total = Σ price × quantity`,
//! `remaining = total − advance`.

use super::{RepoError, RepoResult};
use shared::models::{
    AccountSummary, Transaction, TransactionCreate, TransactionLine, TransactionWithCustomer,
};
use sqlx::SqlitePool;

const TXN_SELECT: &str = "SELECT id, customer_id, total_amount, advance_payment, remaining_amount, created_at, created_by FROM txn";

const TXN_WITH_CUSTOMER_SELECT: &str = "SELECT t.id, t.customer_id, c.name AS customer_name, c.serial_number AS customer_serial_number, t.total_amount, t.advance_payment, t.remaining_amount, t.created_at, t.created_by FROM txn t JOIN customer c ON t.customer_id = c.id";

/// Record a sale: header plus lines in one database transaction.
pub async fn create(
    pool: &SqlitePool,
    data: TransactionCreate,
    created_by: i64,
) -> RepoResult<Transaction> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let total_amount = data.line_total();
    let remaining_amount = total_amount - data.advance_payment;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO txn (id, customer_id, total_amount, advance_payment, remaining_amount, created_at, created_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(data.customer_id)
    .bind(total_amount)
    .bind(data.advance_payment)
    .bind(remaining_amount)
    .bind(now)
    .bind(created_by)
    .execute(&mut *tx)
    .await?;

    for line in &data.items {
        sqlx::query(
            "INSERT INTO txn_item (id, txn_id, item_id, name, price, quantity, is_custom) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(line.item_id)
        .bind(line.name.trim())
        .bind(line.price)
        .bind(line.quantity)
        .bind(line.is_custom)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create transaction".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Transaction>> {
    let sql = format!("{} WHERE id = ?", TXN_SELECT);
    let row = sqlx::query_as::<_, Transaction>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(mut txn) => {
            txn.items = find_lines(pool, txn.id).await?;
            Ok(Some(txn))
        }
        None => Ok(None),
    }
}

pub async fn find_by_id_with_customer(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<TransactionWithCustomer>> {
    let sql = format!("{} WHERE t.id = ?", TXN_WITH_CUSTOMER_SELECT);
    let row = sqlx::query_as::<_, TransactionWithCustomer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(mut txn) => {
            txn.items = find_lines(pool, txn.id).await?;
            Ok(Some(txn))
        }
        None => Ok(None),
    }
}

/// Most recent transactions with customer identity, newest first.
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<TransactionWithCustomer>> {
    let sql = format!(
        "{} ORDER BY t.created_at DESC LIMIT ?",
        TXN_WITH_CUSTOMER_SELECT
    );
    let mut rows = sqlx::query_as::<_, TransactionWithCustomer>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    for txn in &mut rows {
        txn.items = find_lines(pool, txn.id).await?;
    }
    Ok(rows)
}

/// All transactions of one customer, newest first.
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Transaction>> {
    let sql = format!("{} WHERE customer_id = ? ORDER BY created_at DESC", TXN_SELECT);
    let mut rows = sqlx::query_as::<_, Transaction>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;

    for txn in &mut rows {
        txn.items = find_lines(pool, txn.id).await?;
    }
    Ok(rows)
}

/// One customer's transactions inside an inclusive millis range, newest first.
pub async fn find_by_customer_in_range(
    pool: &SqlitePool,
    customer_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<Transaction>> {
    let sql = format!(
        "{} WHERE customer_id = ?1 AND created_at >= ?2 AND created_at <= ?3 ORDER BY created_at DESC",
        TXN_SELECT
    );
    let mut rows = sqlx::query_as::<_, Transaction>(&sql)
        .bind(customer_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

    for txn in &mut rows {
        txn.items = find_lines(pool, txn.id).await?;
    }
    Ok(rows)
}

async fn find_lines(pool: &SqlitePool, txn_id: i64) -> RepoResult<Vec<TransactionLine>> {
    let rows = sqlx::query_as::<_, TransactionLine>(
        "SELECT id, txn_id, item_id, name, price, quantity, is_custom FROM txn_item WHERE txn_id = ? ORDER BY id ASC",
    )
    .bind(txn_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM txn WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// How many transactions reference a catalog item (delete guard)
pub async fn count_by_item(pool: &SqlitePool, item_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT txn_id) FROM txn_item WHERE item_id = ?")
            .bind(item_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn count_since(pool: &SqlitePool, since_millis: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM txn WHERE created_at >= ?")
        .bind(since_millis)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn sum_total_since(pool: &SqlitePool, since_millis: i64) -> RepoResult<f64> {
    let sum: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(total_amount), 0) FROM txn WHERE created_at >= ?")
            .bind(since_millis)
            .fetch_one(pool)
            .await?;
    Ok(sum)
}

/// Lifetime aggregate for one customer (portal stats)
pub async fn account_summary(pool: &SqlitePool, customer_id: i64) -> RepoResult<AccountSummary> {
    let summary = sqlx::query_as::<_, AccountSummary>(
        "SELECT COUNT(*) AS total_transactions, COALESCE(SUM(total_amount), 0) AS total_amount, COALESCE(SUM(advance_payment), 0) AS total_advance, COALESCE(SUM(remaining_amount), 0) AS outstanding_amount FROM txn WHERE customer_id = ?",
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await?;
    Ok(summary)
}
