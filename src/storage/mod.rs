//! Storage layer for Pocketbook
//!
//! Services talk to storage through two small traits, one per entity kind,
//! so they can be handed any store explicitly. The JSON repositories here are
//! the implementations the binary uses.

pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::PocketbookPaths;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{Category, CategoryId, Money, Transaction, TransactionId, TransactionType};

/// Category persistence as seen by the services
pub trait CategoryStore {
    /// Stored categories whose title is in `titles` (one batched lookup)
    fn find_by_titles(&self, titles: &[String]) -> PocketbookResult<Vec<Category>>;

    /// Build an unsaved category record
    fn create(&self, title: &str) -> Category {
        Category::new(title)
    }

    /// Persist a batch, returning the records as stored
    fn save_all(&self, categories: Vec<Category>) -> PocketbookResult<Vec<Category>>;
}

/// Transaction persistence as seen by the services
pub trait TransactionStore {
    fn find_one(&self, id: TransactionId) -> PocketbookResult<Option<Transaction>>;

    /// Build an unsaved transaction record
    fn create(
        &self,
        title: &str,
        kind: TransactionType,
        value: Money,
        category_id: Option<CategoryId>,
    ) -> Transaction {
        Transaction::new(title, kind, value, category_id)
    }

    /// Persist a batch, returning the records as stored
    fn save_all(&self, transactions: Vec<Transaction>) -> PocketbookResult<Vec<Transaction>>;

    /// Remove a stored transaction permanently
    fn remove(&self, transaction: &Transaction) -> PocketbookResult<()>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PocketbookPaths) -> Result<Self, PocketbookError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            audit: AuditLogger::new(paths.audit_log()),
        })
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), PocketbookError> {
        self.transactions.load()?;
        self.categories.load()?;
        Ok(())
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> PocketbookResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
