//! Storage initialization
//!
//! Handles first-run setup: directories, empty data files and default settings.

use crate::config::paths::PocketbookPaths;
use crate::config::settings::Settings;
use crate::error::PocketbookError;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;
use super::transactions::TransactionData;

/// Initialize storage for a fresh installation
///
/// Existing data files and settings are left untouched.
pub fn initialize_storage(paths: &PocketbookPaths) -> Result<(), PocketbookError> {
    paths.ensure_directories()?;

    if !paths.categories_file().exists() {
        write_json_atomic(paths.categories_file(), &CategoryData::default())?;
    }

    if !paths.transactions_file().exists() {
        write_json_atomic(paths.transactions_file(), &TransactionData::default())?;
    }

    if !paths.is_initialized() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PocketbookPaths) -> bool {
    !paths.is_initialized()
}
