//! Staff Repository

use super::{RepoError, RepoResult};
use shared::models::Staff;
use sqlx::SqlitePool;

const STAFF_SELECT: &str =
    "SELECT id, username, name, role, hash_pass, is_active, created_at FROM staff";

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Staff>> {
    let sql = format!("{} WHERE username = ?", STAFF_SELECT);
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("{} WHERE id = ?", STAFF_SELECT);
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    name: &str,
    role: &str,
    password: &str,
) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let hash_pass = Staff::hash_password(password)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

    sqlx::query(
        "INSERT INTO staff (id, username, name, role, hash_pass, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(name)
    .bind(role)
    .bind(&hash_pass)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff account".into()))
}
