//! Audit log CLI command

use crate::error::PocketbookResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize) -> PocketbookResult<()> {
    let entries = storage.audit.read_recent(limit)?;

    if entries.is_empty() {
        println!("Audit log is empty ({}).", storage.audit.path().display());
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry);
    }

    Ok(())
}
