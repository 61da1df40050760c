//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer account (账户) identified by a human-facing serial number.
///
/// Customers authenticate separately from staff; the initial password is the
/// customer's own mobile number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub serial_number: i64,
    pub name: String,
    pub mobile: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
}

/// Update customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
}

/// Per-customer transaction statistics (customer detail page)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerStats {
    pub total_transactions: i64,
    pub total_amount: f64,
    pub last_transaction_date: Option<i64>,
}

impl Customer {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        crate::models::staff::verify_password(&self.hash_pass, password)
    }
}
