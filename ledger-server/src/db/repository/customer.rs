//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate, CustomerStats, CustomerUpdate};
use sqlx::SqlitePool;

const CUSTOMER_SELECT: &str = "SELECT id, serial_number, name, mobile, address, hash_pass, created_at, updated_at FROM customer";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!("{} ORDER BY serial_number ASC", CUSTOMER_SELECT);
    let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{} WHERE id = ?", CUSTOMER_SELECT);
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_serial(pool: &SqlitePool, serial_number: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{} WHERE serial_number = ?", CUSTOMER_SELECT);
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(serial_number)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Unified search: numeric queries match the serial number exactly,
/// anything else substring-matches name or mobile. Max 10 rows.
pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Customer>> {
    if let Ok(serial) = query.trim().parse::<i64>() {
        let sql = format!("{} WHERE serial_number = ? LIMIT 10", CUSTOMER_SELECT);
        let rows = sqlx::query_as::<_, Customer>(&sql)
            .bind(serial)
            .fetch_all(pool)
            .await?;
        return Ok(rows);
    }

    let pattern = format!("%{}%", query.trim());
    let sql = format!(
        "{} WHERE name LIKE ?1 OR mobile LIKE ?1 ORDER BY serial_number ASC LIMIT 10",
        CUSTOMER_SELECT
    );
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Another customer already using this mobile number?
pub async fn mobile_taken(
    pool: &SqlitePool,
    mobile: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count: i64 = match exclude_id {
        Some(id) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE mobile = ? AND id != ?")
                .bind(mobile)
                .bind(id)
                .fetch_one(pool)
                .await?
        }
        None => sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE mobile = ?")
            .bind(mobile)
            .fetch_one(pool)
            .await?,
    };
    Ok(count > 0)
}

/// Create a customer with the next serial number. The initial portal
/// password is the mobile number itself.
pub async fn create(pool: &SqlitePool, data: CustomerCreate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let mobile = data.mobile.trim().to_string();
    let hash_pass = shared::models::Staff::hash_password(&mobile)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

    let next_serial: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(serial_number), 0) + 1 FROM customer")
            .fetch_one(pool)
            .await?;

    sqlx::query(
        "INSERT INTO customer (id, serial_number, name, mobile, address, hash_pass, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(next_serial)
    .bind(data.name.trim())
    .bind(&mobile)
    .bind(data.address.as_deref().unwrap_or("").trim())
    .bind(&hash_pass)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CustomerUpdate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET name = ?1, mobile = ?2, address = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.name.trim())
    .bind(data.mobile.trim())
    .bind(data.address.as_deref().unwrap_or("").trim())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customer WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Transaction stats for the customer detail page
pub async fn stats(pool: &SqlitePool, id: i64) -> RepoResult<CustomerStats> {
    let stats = sqlx::query_as::<_, CustomerStats>(
        "SELECT COUNT(*) AS total_transactions, COALESCE(SUM(total_amount), 0) AS total_amount, MAX(created_at) AS last_transaction_date FROM txn WHERE customer_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}
