//! CLI command handler for CSV import

use std::path::Path;

use crate::config::{MalformedRowPolicy, Settings};
use crate::display::format_import_report;
use crate::error::{PocketbookError, PocketbookResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
///
/// `fail_fast` overrides the configured malformed-row policy.
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    file: &Path,
    fail_fast: bool,
) -> PocketbookResult<()> {
    if file.is_dir() {
        return Err(PocketbookError::Import(format!(
            "{} is a directory, expected a CSV file",
            file.display()
        )));
    }

    let policy = if fail_fast {
        MalformedRowPolicy::Fail
    } else {
        settings.import.malformed_rows
    };

    let report = ImportService::new(storage)
        .with_policy(policy)
        .import_with_report(file)?;

    print!("{}", format_import_report(&report, &settings.currency_symbol));
    Ok(())
}
