//! Category service
//!
//! Read-side access to categories. Categories are created by imports only.

use crate::error::PocketbookResult;
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

/// Service for category queries
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// A category together with how many transactions are filed under it
#[derive(Debug, Clone)]
pub struct CategoryUsage {
    pub category: Category,
    pub transaction_count: usize,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Find a category by title or ID string
    ///
    /// An exact title wins, then an ID, then a case-insensitive title.
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Category>> {
        let identifier = identifier.trim();

        if let Some(category) = self.storage.categories.get_by_title(identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(Some(category));
            }
        }

        let lower = identifier.to_lowercase();
        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.title.to_lowercase() == lower))
    }

    /// List all categories, oldest first
    pub fn list(&self) -> PocketbookResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Every category with its transaction count
    pub fn usage(&self) -> PocketbookResult<Vec<CategoryUsage>> {
        self.list()?
            .into_iter()
            .map(|category| -> PocketbookResult<CategoryUsage> {
                let transaction_count = self.storage.transactions.get_by_category(category.id)?.len();
                Ok(CategoryUsage {
                    category,
                    transaction_count,
                })
            })
            .collect()
    }

    /// Number of transactions with no category
    pub fn uncategorized_count(&self) -> PocketbookResult<usize> {
        Ok(self
            .storage
            .transactions
            .get_all()?
            .iter()
            .filter(|t| t.category_id.is_none())
            .count())
    }
}
