//! Item Repository

use super::{RepoError, RepoResult};
use shared::models::{Item, ItemCreate};
use sqlx::SqlitePool;

const ITEM_SELECT: &str =
    "SELECT id, name, price, description, image, is_active, created_at, updated_at FROM item";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Item>> {
    let sql = format!("{} ORDER BY name ASC", ITEM_SELECT);
    let rows = sqlx::query_as::<_, Item>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Item>> {
    let sql = format!("{} WHERE id = ?", ITEM_SELECT);
    let row = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Same name at the same price already in the catalog?
pub async fn name_price_taken(pool: &SqlitePool, name: &str, price: f64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item WHERE name = ? AND price = ?")
        .bind(name)
        .bind(price)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate, image: &str) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO item (id, name, price, description, image, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.price)
    .bind(data.description.as_deref().unwrap_or("").trim())
    .bind(image)
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE item SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(is_active)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
