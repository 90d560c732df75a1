//! Pocketbook - a small personal finance ledger
//!
//! Transactions (income or outcome, with a value and an optional category)
//! are kept in JSON files. Bulk entry happens through CSV import, which
//! reconciles the category titles in the file against the stored categories
//! and creates only the missing ones.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: the crate error type
//! - `models`: transactions, categories, money and ids
//! - `storage`: JSON repositories behind the `CategoryStore` and
//!   `TransactionStore` traits
//! - `audit`: append-only audit log
//! - `services`: import, deletion and queries
//! - `cli` / `display`: command handlers and terminal formatting
//! - `logging`: tracing subscriber setup for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pocketbook::config::PocketbookPaths;
//! use pocketbook::services::ImportService;
//! use pocketbook::storage::Storage;
//!
//! let mut storage = Storage::new(PocketbookPaths::new()?)?;
//! storage.load_all()?;
//! let created = ImportService::new(&storage).import("statement.csv")?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{PocketbookError, PocketbookResult};
