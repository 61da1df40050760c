//! Transaction Model
//!
//! A sale record: line items (catalog or ad-hoc "custom" lines), total
//! amount, advance payment and the remaining (outstanding) amount.
//! `remaining_amount` may go negative when a customer pays more than the
//! purchase total; that credit is carried on the statement.

use serde::{Deserialize, Serialize};

/// Transaction header (表头). Lines are stored separately in `txn_item`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub customer_id: i64,
    pub total_amount: f64,
    pub advance_payment: f64,
    pub remaining_amount: f64,
    pub created_at: i64,
    /// Staff account that recorded the sale
    pub created_by: i64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<TransactionLine>,
}

/// One line of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TransactionLine {
    pub id: i64,
    pub txn_id: i64,
    /// None for ad-hoc "custom" lines that never existed in the catalog
    pub item_id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub is_custom: bool,
}

/// Transaction with customer identity attached (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TransactionWithCustomer {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_serial_number: i64,
    pub total_amount: f64,
    pub advance_payment: f64,
    pub remaining_amount: f64,
    pub created_at: i64,
    pub created_by: i64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<TransactionLine>,
}

/// Create transaction payload.
///
/// The server recomputes `total_amount` and `remaining_amount` from the
/// lines and the advance payment; clients cannot supply totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCreate {
    pub customer_id: i64,
    #[serde(default)]
    pub items: Vec<TransactionLineCreate>,
    #[serde(default)]
    pub advance_payment: f64,
}

/// One line of a create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLineCreate {
    /// Omitted for custom lines
    pub item_id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub is_custom: bool,
}

/// Aggregate over a set of transactions (portal stats, statement footer)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AccountSummary {
    pub total_transactions: i64,
    pub total_amount: f64,
    pub total_advance: f64,
    pub outstanding_amount: f64,
}

impl TransactionCreate {
    /// Total of all lines: Σ price × quantity
    pub fn line_total(&self) -> f64 {
        self.items
            .iter()
            .map(|line| line.price * line.quantity as f64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, quantity: i64) -> TransactionLineCreate {
        TransactionLineCreate {
            item_id: None,
            name: "x".into(),
            price,
            quantity,
            is_custom: true,
        }
    }

    #[test]
    fn line_total_sums_price_times_quantity() {
        let payload = TransactionCreate {
            customer_id: 1,
            items: vec![line(10.0, 3), line(2.5, 4)],
            advance_payment: 0.0,
        };
        assert_eq!(payload.line_total(), 40.0);
    }

    #[test]
    fn empty_lines_total_zero() {
        let payload = TransactionCreate {
            customer_id: 1,
            items: vec![],
            advance_payment: 100.0,
        };
        assert_eq!(payload.line_total(), 0.0);
    }
}
