//! Audit logging for Pocketbook
//!
//! Records imported categories and transactions and removed transactions in
//! an append-only JSON-lines log.
//!
//! - `AuditEntry`: one operation with timestamp, entity information and
//!   before/after snapshots.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
