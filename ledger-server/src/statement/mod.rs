//! Statement building
//!
//! A statement is one customer's transactions over a date range plus the
//! account totals, rendered as JSON, PDF or WhatsApp text.

pub mod pdf;
pub mod whatsapp;

use serde::Serialize;
use shared::models::{Customer, Transaction};

/// Totals over a set of transactions.
///
/// `outstanding` is Σ remaining and may be negative: the customer paid more
/// than they purchased and carries a credit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatementTotals {
    pub total_amount: f64,
    pub total_advance: f64,
    pub outstanding: f64,
}

impl StatementTotals {
    /// Label for the closing line: credit balances read "Balance",
    /// debts read "Outstanding".
    pub fn closing_label(&self) -> &'static str {
        if self.outstanding < 0.0 {
            "Balance"
        } else {
            "Outstanding"
        }
    }
}

/// Everything a renderer needs
#[derive(Debug, Clone)]
pub struct StatementData {
    pub business_name: String,
    pub customer: Customer,
    pub transactions: Vec<Transaction>,
    /// Inclusive range, millis
    pub from: i64,
    pub to: i64,
    pub totals: StatementTotals,
}

/// Sum a transaction list into statement totals
pub fn summarize(transactions: &[Transaction]) -> StatementTotals {
    let mut totals = StatementTotals::default();
    for t in transactions {
        totals.total_amount += t.total_amount;
        totals.total_advance += t.advance_payment;
        totals.outstanding += t.remaining_amount;
    }
    totals
}

#[cfg(test)]
pub(crate) fn test_customer() -> Customer {
    Customer {
        id: 1,
        serial_number: 12,
        name: "Priya Sharma".into(),
        mobile: "98-7654-3211".into(),
        address: "456 Park Avenue".into(),
        hash_pass: String::new(),
        created_at: 0,
        updated_at: 0,
    }
}

#[cfg(test)]
pub(crate) fn test_transaction(total: f64, advance: f64) -> Transaction {
    Transaction {
        id: shared::util::snowflake_id(),
        customer_id: 1,
        total_amount: total,
        advance_payment: advance,
        remaining_amount: total - advance,
        created_at: 1_714_521_600_000, // 2024-05-01
        created_by: 1,
        items: vec![],
    }
}
