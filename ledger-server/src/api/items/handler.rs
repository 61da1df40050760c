//! Item Catalog Handlers
//!
//! 创建接口使用 multipart 表单（文本字段 + 可选图片），图片落盘到
//! `<work_dir>/uploads/items/`，通过 `/uploads/` 静态路由对外提供。

use std::fs;
use std::path::PathBuf;

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::repository::{item, txn};
use crate::utils::{AppError, AppResult};
use shared::models::{Item, ItemCreate, ItemSetActive};

/// Maximum image size (5MB)
pub(super) const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// GET /api/items - 商品列表，按名称排序
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Item>>> {
    let items = item::find_all(state.get_pool()).await?;
    Ok(Json(items))
}

/// GET /api/items/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    let item = item::find_by_id(state.get_pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {} not found", id)))?;
    Ok(Json(item))
}

/// POST /api/items - 创建商品（仅 admin，multipart）
///
/// 字段: name, price, description?, is_active?, image? (file)
pub async fn create(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<Item>> {
    let mut name: Option<String> = None;
    let mut price: Option<f64> = None;
    let mut description: Option<String> = None;
    let mut is_active = true;
    let mut image_data: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => {
                name = Some(read_text(field).await?);
            }
            "price" => {
                let raw = read_text(field).await?;
                price = Some(
                    raw.trim()
                        .parse::<f64>()
                        .map_err(|_| AppError::invalid("Price must be a number"))?,
                );
            }
            "description" => {
                description = Some(read_text(field).await?);
            }
            "is_active" => {
                let raw = read_text(field).await?;
                is_active = raw.trim() != "false";
            }
            "image" => {
                let ext = image_extension(&field)?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
                if !bytes.is_empty() {
                    image_data = Some((bytes.to_vec(), ext));
                }
            }
            _ => {}
        }
    }

    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::invalid("Name and price are required"))?;
    let price = price.ok_or_else(|| AppError::invalid("Name and price are required"))?;
    if price <= 0.0 {
        return Err(AppError::invalid("Price must be greater than zero"));
    }

    if item::name_price_taken(state.get_pool(), &name, price).await? {
        return Err(AppError::conflict(
            "Item with this name and price already exists",
        ));
    }

    let image = match image_data {
        Some((bytes, ext)) => save_image(&state, &bytes, &ext)?,
        None => String::new(),
    };

    let payload = ItemCreate {
        name,
        price,
        description,
        is_active,
    };
    let item = item::create(state.get_pool(), payload, &image).await?;
    tracing::info!(id = item.id, name = %item.name, "Item created");
    Ok(Json(item))
}

/// PATCH /api/items/:id - 启用/停用商品（仅 admin）
pub async fn set_active(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemSetActive>,
) -> AppResult<Json<Item>> {
    let item = item::set_active(state.get_pool(), id, payload.is_active).await?;
    Ok(Json(item))
}

/// DELETE /api/items/:id - 删除商品（仅 admin）
///
/// 已被交易引用的商品不可删除，只能停用。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let usage = txn::count_by_item(state.get_pool(), id).await?;
    if usage > 0 {
        return Err(AppError::validation(
            "Cannot delete item used in transactions. Deactivate it instead.",
        ));
    }

    let deleted = item::delete(state.get_pool(), id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Item {} not found", id)));
    }
    tracing::info!(id, "Item deleted");
    Ok(Json(true))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))
}

/// Resolve the image extension from the filename, falling back to the
/// declared content type.
fn image_extension(field: &axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    let from_name = field
        .file_name()
        .and_then(|f| PathBuf::from(f).extension().map(|e| e.to_string_lossy().to_lowercase()));
    let from_mime = field
        .content_type()
        .and_then(|ct| mime_guess::get_mime_extensions_str(ct))
        .and_then(|exts| exts.first())
        .map(|e| e.to_string());

    let ext = from_name
        .or(from_mime)
        .ok_or_else(|| AppError::validation("Image has no recognizable format"))?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported image format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    Ok(ext)
}

/// Write the image under `<uploads>/items/` and return its relative URL path.
fn save_image(state: &ServerState, bytes: &[u8], ext: &str) -> Result<String, AppError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(AppError::validation(format!(
            "Image too large. Maximum size is {}MB",
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }

    let items_dir = state.config.uploads_dir().join("items");
    fs::create_dir_all(&items_dir)
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {}", e)))?;

    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    fs::write(items_dir.join(&filename), bytes)
        .map_err(|e| AppError::internal(format!("Failed to save image: {}", e)))?;

    Ok(format!("items/{}", filename))
}
