//! Domain models
//!
//! Entities and create/update payloads. `sqlx::FromRow` derives are gated
//! behind the `db` feature so client-side users don't pull in sqlx.

pub mod customer;
pub mod item;
pub mod staff;
pub mod transaction;

pub use customer::{Customer, CustomerCreate, CustomerStats, CustomerUpdate};
pub use item::{Item, ItemCreate, ItemSetActive};
pub use staff::{Staff, StaffRole};
pub use transaction::{
    AccountSummary, Transaction, TransactionCreate, TransactionLine, TransactionLineCreate,
    TransactionWithCustomer,
};
