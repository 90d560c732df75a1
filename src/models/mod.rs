//! Core data models for Pocketbook
//!
//! Transactions, the categories they are filed under, and the money and id
//! types they are built from.

pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use category::Category;
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use transaction::{Transaction, TransactionType};
