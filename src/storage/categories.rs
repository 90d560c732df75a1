//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Titles are
//! unique: a batched save that meets an already stored title hands back the
//! stored record instead of inserting a second one.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PocketbookError;
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::CategoryStore;

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

fn lock_error(e: impl std::fmt::Display) -> PocketbookError {
    PocketbookError::Storage(format!("Failed to acquire category lock: {}", e))
}

fn sorted(mut list: Vec<Category>) -> Vec<Category> {
    list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.title.cmp(&b.title)));
    list
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), PocketbookError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self.categories.write().map_err(lock_error)?;
        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), PocketbookError> {
        let categories = self.categories.read().map_err(lock_error)?;

        let file_data = CategoryData {
            categories: sorted(categories.values().cloned().collect()),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, PocketbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    /// Get all categories, oldest first
    pub fn get_all(&self) -> Result<Vec<Category>, PocketbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(sorted(categories.values().cloned().collect()))
    }

    /// Get a category by exact title
    pub fn get_by_title(&self, title: &str) -> Result<Option<Category>, PocketbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.values().find(|c| c.title == title).cloned())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, PocketbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.len())
    }
}

impl CategoryStore for CategoryRepository {
    fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>, PocketbookError> {
        let wanted: HashSet<&str> = titles.iter().map(String::as_str).collect();
        let categories = self.categories.read().map_err(lock_error)?;

        Ok(sorted(
            categories
                .values()
                .filter(|c| wanted.contains(c.title.as_str()))
                .cloned()
                .collect(),
        ))
    }

    fn save_all(&self, batch: Vec<Category>) -> Result<Vec<Category>, PocketbookError> {
        for category in &batch {
            category
                .validate()
                .map_err(|e| PocketbookError::Validation(e.to_string()))?;
        }

        let saved = {
            let mut categories = self.categories.write().map_err(lock_error)?;
            let mut by_title: HashMap<String, CategoryId> = categories
                .values()
                .map(|c| (c.title.clone(), c.id))
                .collect();

            let mut saved = Vec::with_capacity(batch.len());
            for category in batch {
                match by_title.get(&category.title) {
                    Some(existing_id) if *existing_id != category.id => {
                        // Title already taken: the stored record wins
                        if let Some(existing) = categories.get(existing_id) {
                            saved.push(existing.clone());
                        }
                    }
                    _ => {
                        by_title.insert(category.title.clone(), category.id);
                        categories.insert(category.id, category.clone());
                        saved.push(category);
                    }
                }
            }
            saved
        };

        self.save()?;
        Ok(saved)
    }
}
