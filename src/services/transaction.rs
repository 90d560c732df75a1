//! Transaction service
//!
//! Deletion, lookup, listing and balance over stored transactions.

use std::fmt;

use tracing::{debug, info, warn};

use crate::audit::EntityType;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{CategoryId, Money, Transaction, TransactionId, TransactionType};
use crate::storage::{Storage, TransactionStore};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Income and outcome totals across a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    pub income: Money,
    pub outcome: Money,
    /// `income - outcome`
    pub total: Money,
}

impl Balance {
    /// Sum income and outcome, failing if a total leaves the `Money` range
    pub fn from_transactions<'t>(
        transactions: impl IntoIterator<Item = &'t Transaction>,
    ) -> PocketbookResult<Self> {
        let overflow = || PocketbookError::Validation("Balance total is out of range".into());

        let (mut income, mut outcome) = (Money::zero(), Money::zero());
        for txn in transactions {
            let sum = match txn.kind {
                TransactionType::Income => &mut income,
                TransactionType::Outcome => &mut outcome,
            };
            *sum = sum.checked_add(txn.value).ok_or_else(overflow)?;
        }

        Ok(Self {
            income,
            outcome,
            total: income.checked_sub(outcome).ok_or_else(overflow)?,
        })
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "income {} / outcome {} / total {}",
            self.income, self.outcome, self.total
        )
    }
}

/// Remove the transaction identified by `identifier` from `store`
///
/// An identifier that does not parse, or that matches nothing, is reported as
/// not found and leaves the store untouched.
pub fn delete_transaction(
    store: &dyn TransactionStore,
    identifier: &str,
) -> PocketbookResult<Transaction> {
    let not_found = || PocketbookError::transaction_not_found(identifier.trim());

    let id: TransactionId = identifier.parse().map_err(|_| not_found())?;
    let txn = store.find_one(id)?.ok_or_else(not_found)?;

    store.remove(&txn)?;
    Ok(txn)
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Find a transaction by ID string
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Transaction>> {
        match identifier.parse::<TransactionId>() {
            Ok(id) => self.storage.transactions.get(id),
            Err(_) => Ok(None),
        }
    }

    /// List transactions newest first
    pub fn list(&self, filter: TransactionFilter) -> PocketbookResult<Vec<Transaction>> {
        let mut transactions = match filter.category_id {
            Some(category_id) => self.storage.transactions.get_by_category(category_id)?,
            None => self.storage.transactions.get_all()?,
        };

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Totals across every stored transaction
    pub fn balance(&self) -> PocketbookResult<Balance> {
        let transactions = self.storage.transactions.get_all()?;
        Balance::from_transactions(&transactions)
    }

    /// Permanently delete a transaction, returning the removed record
    pub fn delete(&self, identifier: &str) -> PocketbookResult<Transaction> {
        debug!(identifier, "deleting transaction");
        let txn = delete_transaction(&self.storage.transactions, identifier)?;

        // The record is already gone; a failed audit write must not report otherwise
        if let Err(e) = self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_full_string(),
            Some(txn.title.clone()),
            &txn,
        ) {
            warn!(id = %txn.id, error = %e, "failed to record deletion in audit log");
        }

        info!(id = %txn.id, title = %txn.title, "transaction deleted");
        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::PocketbookPaths;
    use crate::models::Category;
    use crate::storage::CategoryStore;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) -> (CategoryId, Vec<Transaction>) {
        let food = storage
            .categories
            .save_all(vec![Category::new("Food")])
            .unwrap()
            .remove(0);

        let transactions = storage
            .transactions
            .save_all(vec![
                Transaction::new("Salary", TransactionType::Income, Money::from_cents(500000), None),
                Transaction::new("Coffee", TransactionType::Outcome, Money::from_cents(450), Some(food.id)),
                Transaction::new("Lunch", TransactionType::Outcome, Money::from_cents(1250), Some(food.id)),
            ])
            .unwrap();

        (food.id, transactions)
    }

    #[test]
    fn test_delete_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let (_, transactions) = seed(&storage);
        let service = TransactionService::new(&storage);

        let target = &transactions[1];
        let deleted = service.delete(&target.id.to_full_string()).unwrap();

        assert_eq!(deleted.id, target.id);
        assert!(storage.transactions.get(target.id).unwrap().is_none());
        assert_eq!(storage.transactions.count().unwrap(), 2);

        let entries = storage.audit.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Delete);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Coffee"));
    }

    #[test]
    fn test_delete_accepts_bare_uuid() {
        let (_temp_dir, storage) = create_test_storage();
        let (_, transactions) = seed(&storage);
        let service = TransactionService::new(&storage);

        let bare = transactions[0].id.as_uuid().to_string();
        service.delete(&bare).unwrap();
        assert_eq!(storage.transactions.count().unwrap(), 2);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let service = TransactionService::new(&storage);

        let err = service
            .delete(&TransactionId::new().to_full_string())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.transactions.count().unwrap(), 3);
        assert!(storage.audit.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_invalid_id_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let service = TransactionService::new(&storage);

        let err = service.delete("not-an-id").unwrap_err();
        assert!(matches!(
            err,
            PocketbookError::NotFound { entity_type: "Transaction", .. }
        ));
        assert_eq!(storage.transactions.count().unwrap(), 3);
    }

    /// Counts store calls so deletion can be checked for one lookup, one remove
    #[derive(Default)]
    struct CountingStore {
        stored: Option<Transaction>,
        finds: Cell<usize>,
        removes: Cell<usize>,
    }

    impl TransactionStore for CountingStore {
        fn find_one(&self, id: TransactionId) -> PocketbookResult<Option<Transaction>> {
            self.finds.set(self.finds.get() + 1);
            Ok(self.stored.clone().filter(|t| t.id == id))
        }

        fn save_all(&self, transactions: Vec<Transaction>) -> PocketbookResult<Vec<Transaction>> {
            Ok(transactions)
        }

        fn remove(&self, _transaction: &Transaction) -> PocketbookResult<()> {
            self.removes.set(self.removes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_delete_transaction_calls_store_once_each() {
        let txn = Transaction::new("Rent", TransactionType::Outcome, Money::from_cents(120000), None);
        let store = CountingStore {
            stored: Some(txn.clone()),
            ..Default::default()
        };

        delete_transaction(&store, &txn.id.to_full_string()).unwrap();
        assert_eq!(store.finds.get(), 1);
        assert_eq!(store.removes.get(), 1);

        let err = delete_transaction(&store, &TransactionId::new().to_full_string()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.removes.get(), 1);
    }

    #[test]
    fn test_list_with_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let (food, _) = seed(&storage);
        let service = TransactionService::new(&storage);

        assert_eq!(service.list(TransactionFilter::new()).unwrap().len(), 3);
        assert_eq!(
            service
                .list(TransactionFilter::new().category(food))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            service.list(TransactionFilter::new().limit(1)).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_find() {
        let (_temp_dir, storage) = create_test_storage();
        let (_, transactions) = seed(&storage);
        let service = TransactionService::new(&storage);

        let found = service
            .find(&transactions[0].id.to_full_string())
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "Salary");
        assert!(service.find("garbage").unwrap().is_none());
    }

    #[test]
    fn test_balance() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let service = TransactionService::new(&storage);

        let balance = service.balance().unwrap();
        assert_eq!(balance.income.cents(), 500000);
        assert_eq!(balance.outcome.cents(), 1700);
        assert_eq!(balance.total.cents(), 498300);
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let huge = Transaction::new(
            "Lottery",
            TransactionType::Income,
            Money::from_cents(i64::MAX - 1),
            None,
        );
        let bonus = Transaction::new("Bonus", TransactionType::Income, Money::from_cents(10), None);

        let err = Balance::from_transactions([&huge, &bonus]).unwrap_err();
        assert!(matches!(err, PocketbookError::Validation(_)));

        let debt = Transaction::new(
            "Debt",
            TransactionType::Outcome,
            Money::from_cents(i64::MAX),
            None,
        );
        let refund = Transaction::new("Refund", TransactionType::Income, Money::from_cents(-10), None);
        assert!(Balance::from_transactions([&refund, &debt]).is_err());
    }

    #[test]
    fn test_delete_succeeds_when_audit_log_unwritable() {
        let (_temp_dir, storage) = create_test_storage();
        let (_, transactions) = seed(&storage);
        fs::create_dir_all(storage.audit.path()).unwrap();

        let deleted = TransactionService::new(&storage)
            .delete(&transactions[0].id.to_full_string())
            .unwrap();

        assert_eq!(deleted.title, "Salary");
        assert!(storage.transactions.get(deleted.id).unwrap().is_none());
    }

    #[test]
    fn test_balance_empty() {
        let (_temp_dir, storage) = create_test_storage();
        let balance = TransactionService::new(&storage).balance().unwrap();
        assert_eq!(balance, Balance::default());
    }
}
