//! Shared types for the ledger system
//!
//! Domain models, API payloads and utility functions used by both the
//! server and any in-process test clients.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
