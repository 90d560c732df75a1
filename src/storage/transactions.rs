//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PocketbookError;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::TransactionStore;

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TransactionData {
    pub transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

fn lock_error(e: impl std::fmt::Display) -> PocketbookError {
    PocketbookError::Storage(format!("Failed to acquire transaction lock: {}", e))
}

/// Newest first; title breaks ties so listings are stable
fn newest_first(list: &mut [Transaction]) {
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.title.cmp(&b.title)));
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the category index
    pub fn load(&self) -> Result<(), PocketbookError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            if let Some(cat_id) = txn.category_id {
                by_category.entry(cat_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), PocketbookError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        newest_first(&mut transactions);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, PocketbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, PocketbookError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Get transactions filed under a category, newest first
    pub fn get_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Transaction>, PocketbookError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_category = self.by_category.read().map_err(lock_error)?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Insert or update a transaction in memory
    pub fn upsert(&self, txn: Transaction) -> Result<(), PocketbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        if let Some(old_cat) = data.get(&txn.id).and_then(|old| old.category_id) {
            if let Some(ids) = by_category.get_mut(&old_cat) {
                ids.retain(|&id| id != txn.id);
            }
        }

        if let Some(cat_id) = txn.category_id {
            by_category.entry(cat_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction from memory, returning whether it existed
    pub fn delete(&self, id: TransactionId) -> Result<bool, PocketbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        match data.remove(&id) {
            Some(txn) => {
                if let Some(cat_id) = txn.category_id {
                    if let Some(ids) = by_category.get_mut(&cat_id) {
                        ids.retain(|&tid| tid != id);
                    }
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, PocketbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

impl TransactionStore for TransactionRepository {
    fn find_one(&self, id: TransactionId) -> Result<Option<Transaction>, PocketbookError> {
        self.get(id)
    }

    fn save_all(&self, batch: Vec<Transaction>) -> Result<Vec<Transaction>, PocketbookError> {
        for txn in &batch {
            txn.validate()
                .map_err(|e| PocketbookError::Validation(e.to_string()))?;
        }

        for txn in &batch {
            self.upsert(txn.clone())?;
        }

        self.save()?;
        Ok(batch)
    }

    fn remove(&self, transaction: &Transaction) -> Result<(), PocketbookError> {
        if !self.delete(transaction.id)? {
            return Err(PocketbookError::transaction_not_found(
                transaction.id.to_full_string(),
            ));
        }
        self.save()
    }
}
