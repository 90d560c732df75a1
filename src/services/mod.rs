//! Service layer for Pocketbook
//!
//! Services hold borrowed handles to storage and carry the business rules:
//! CSV import with category reconciliation, transaction deletion, and the
//! read-side queries the CLI needs.

pub mod category;
pub mod import;
pub mod transaction;

pub use category::{CategoryService, CategoryUsage};
pub use import::{CsvTransaction, ImportReport, ImportService, ParsedCsv, SkippedRow};
pub use transaction::{delete_transaction, Balance, TransactionFilter, TransactionService};
