//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print to
//! stdout and return errors for `main` to report.

pub mod audit;
pub mod category;
pub mod import;
pub mod transaction;

pub use audit::handle_audit_command;
pub use category::{handle_category_command, CategoryCommands};
pub use import::handle_import_command;
pub use transaction::{handle_transaction_command, TransactionCommands};
