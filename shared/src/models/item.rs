//! Item Model

use serde::{Deserialize, Serialize};

/// Catalog item. Items referenced by transactions are deactivated via
/// `is_active` rather than deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    /// Relative URL below `/uploads/`, empty when no image was uploaded
    pub image: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create item payload (multipart form fields, image handled separately)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Toggle payload for PATCH /api/items/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSetActive {
    pub is_active: bool,
}
