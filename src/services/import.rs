//! CSV import service
//!
//! Reads a `title,type,value,category` CSV, reconciles the category titles it
//! references against storage (creating only the missing ones), persists the
//! resulting transactions and removes the source file.
//!
//! The whole file is parsed into memory before any category lookup happens,
//! so reconciliation always sees every row.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::MalformedRowPolicy;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::category::MAX_TITLE_LEN;
use crate::models::{Category, CategoryId, Money, Transaction, TransactionType};
use crate::storage::{CategoryStore, Storage, TransactionStore};

/// Number of cells a data row must carry
const CELLS_PER_ROW: usize = 4;

/// A row accepted from the CSV, before its category is resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTransaction {
    /// 1-based line in the source file
    pub line: u64,
    pub title: String,
    pub kind: TransactionType,
    pub value: Money,
    /// Raw category title; empty means uncategorized
    pub category: String,
}

/// A row that could not be turned into a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Everything collected from one pass over the CSV
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    /// Accepted rows in file order
    pub transactions: Vec<CsvTransaction>,
    /// Category title of every accepted row, duplicates and blanks included
    pub category_titles: Vec<String>,
    /// Malformed rows skipped under [`MalformedRowPolicy::Skip`]
    pub skipped: Vec<SkippedRow>,
    /// Rows dropped because title, type or value was blank
    pub blank_rows: usize,
}

/// Outcome of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Created transactions in file order
    pub transactions: Vec<Transaction>,
    /// Categories this import created
    pub created_categories: Vec<Category>,
    /// Stored categories this import linked to
    pub existing_categories: Vec<Category>,
    pub skipped: Vec<SkippedRow>,
    pub blank_rows: usize,
}

impl ImportReport {
    /// Title of a category touched by this import
    pub fn category_title(&self, id: CategoryId) -> Option<&str> {
        self.created_categories
            .iter()
            .chain(&self.existing_categories)
            .find(|c| c.id == id)
            .map(|c| c.title.as_str())
    }
}

enum RowOutcome {
    Accepted(CsvTransaction),
    Blank,
    Malformed(SkippedRow),
}

/// Service for CSV import
pub struct ImportService<'a> {
    categories: &'a dyn CategoryStore,
    transactions: &'a dyn TransactionStore,
    audit: Option<&'a AuditLogger>,
    policy: MalformedRowPolicy,
}

impl<'a> ImportService<'a> {
    /// Create an import service over the JSON storage, with auditing
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            categories: &storage.categories,
            transactions: &storage.transactions,
            audit: Some(&storage.audit),
            policy: MalformedRowPolicy::default(),
        }
    }

    /// Create an import service over arbitrary stores, without auditing
    pub fn with_stores(
        categories: &'a dyn CategoryStore,
        transactions: &'a dyn TransactionStore,
    ) -> Self {
        Self {
            categories,
            transactions,
            audit: None,
            policy: MalformedRowPolicy::default(),
        }
    }

    /// Set how malformed rows are handled
    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Import the CSV at `path`, returning the created transactions in file order
    pub fn import<P: AsRef<Path>>(&self, path: P) -> PocketbookResult<Vec<Transaction>> {
        Ok(self.import_with_report(path)?.transactions)
    }

    /// Import the CSV at `path` and describe what happened
    ///
    /// The source file is removed only after categories and transactions have
    /// both been saved; on any earlier failure it is left in place.
    pub fn import_with_report<P: AsRef<Path>>(&self, path: P) -> PocketbookResult<ImportReport> {
        let path = path.as_ref();
        debug!(file = %path.display(), "starting import");

        let file = File::open(path).map_err(|e| {
            PocketbookError::Io(format!(
                "Failed to open import file {}: {}",
                path.display(),
                e
            ))
        })?;
        let parsed = self.parse_csv_from_reader(file)?;
        debug!(
            rows = parsed.transactions.len(),
            skipped = parsed.skipped.len(),
            blank = parsed.blank_rows,
            "parsed import file"
        );

        let (created_categories, existing_categories) =
            self.reconcile_categories(&parsed.category_titles)?;

        // New first, then existing; titles are unique across both
        let pool: Vec<&Category> = created_categories
            .iter()
            .chain(&existing_categories)
            .collect();

        let batch: Vec<Transaction> = parsed
            .transactions
            .iter()
            .map(|row| {
                self.transactions.create(
                    &row.title,
                    row.kind,
                    row.value,
                    resolve_category(&pool, &row.category),
                )
            })
            .collect();

        let transactions = if batch.is_empty() {
            batch
        } else {
            self.transactions.save_all(batch)?
        };

        fs::remove_file(path).map_err(|e| {
            PocketbookError::Io(format!(
                "Failed to remove import file {}: {}",
                path.display(),
                e
            ))
        })?;

        // Everything is committed and the file is gone; report success regardless
        if let Err(e) = self.audit_import(&created_categories, &transactions) {
            warn!(error = %e, "failed to record import in audit log");
        }

        info!(
            transactions = transactions.len(),
            created_categories = created_categories.len(),
            skipped = parsed.skipped.len(),
            "import complete"
        );

        Ok(ImportReport {
            transactions,
            created_categories,
            existing_categories,
            skipped: parsed.skipped,
            blank_rows: parsed.blank_rows,
        })
    }

    /// Drain a CSV source into memory
    ///
    /// The first record is a header and is skipped. Under
    /// [`MalformedRowPolicy::Fail`] the first malformed row is returned as
    /// [`PocketbookError::MalformedRow`].
    pub fn parse_csv_from_reader<R: Read>(&self, reader: R) -> PocketbookResult<ParsedCsv> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut parsed = ParsedCsv::default();

        for result in reader.records() {
            let outcome = match result {
                Ok(record) => parse_record(&record),
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => RowOutcome::Malformed(SkippedRow {
                    line: e.position().map(|p| p.line()).unwrap_or(0),
                    reason: e.to_string(),
                }),
            };

            match outcome {
                RowOutcome::Accepted(row) => {
                    parsed.category_titles.push(row.category.clone());
                    parsed.transactions.push(row);
                }
                RowOutcome::Blank => parsed.blank_rows += 1,
                RowOutcome::Malformed(skipped) => match self.policy {
                    MalformedRowPolicy::Fail => {
                        return Err(PocketbookError::MalformedRow {
                            line: skipped.line,
                            reason: skipped.reason,
                        });
                    }
                    MalformedRowPolicy::Skip => {
                        warn!(line = skipped.line, reason = %skipped.reason, "skipping malformed row");
                        parsed.skipped.push(skipped);
                    }
                },
            }
        }

        Ok(parsed)
    }

    /// Find the stored categories among `titles` and create the missing ones
    ///
    /// Returns `(created, existing)`. Blank titles are never created. Missing
    /// titles are created once each, in first-occurrence order, with a single
    /// batched save.
    pub fn reconcile_categories(
        &self,
        titles: &[String],
    ) -> PocketbookResult<(Vec<Category>, Vec<Category>)> {
        let mut existing = self.categories.find_by_titles(titles)?;
        let existing_titles: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();

        let mut seen = HashSet::new();
        let new_records: Vec<Category> = titles
            .iter()
            .map(String::as_str)
            .filter(|title| !title.is_empty())
            .filter(|title| !existing_titles.contains(title))
            .filter(|title| seen.insert(*title))
            .map(|title| self.categories.create(title))
            .collect();

        if new_records.is_empty() {
            return Ok((Vec::new(), existing));
        }

        let new_ids: HashSet<CategoryId> = new_records.iter().map(|c| c.id).collect();
        debug!(count = new_records.len(), "creating categories");

        let mut created = Vec::with_capacity(new_records.len());
        for category in self.categories.save_all(new_records)? {
            if new_ids.contains(&category.id) {
                created.push(category);
            } else if !existing.iter().any(|c| c.id == category.id) {
                // Another writer stored this title first
                existing.push(category);
            }
        }

        Ok((created, existing))
    }

    fn audit_import(
        &self,
        categories: &[Category],
        transactions: &[Transaction],
    ) -> PocketbookResult<()> {
        let Some(audit) = self.audit else {
            return Ok(());
        };

        let entries: Vec<AuditEntry> = categories
            .iter()
            .map(|c| {
                AuditEntry::create(
                    EntityType::Category,
                    c.id.to_full_string(),
                    Some(c.title.clone()),
                    c,
                )
            })
            .chain(transactions.iter().map(|t| {
                AuditEntry::create(
                    EntityType::Transaction,
                    t.id.to_full_string(),
                    Some(t.title.clone()),
                    t,
                )
            }))
            .collect();

        audit.log_batch(&entries)
    }
}

/// First category in `pool` whose title matches; blank means uncategorized
fn resolve_category(pool: &[&Category], title: &str) -> Option<CategoryId> {
    if title.is_empty() {
        return None;
    }
    pool.iter().find(|c| c.title == title).map(|c| c.id)
}

/// Classify a single data record
fn parse_record(record: &StringRecord) -> RowOutcome {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    if record.len() < CELLS_PER_ROW {
        return RowOutcome::Malformed(SkippedRow {
            line,
            reason: format!(
                "expected {} cells, found {}",
                CELLS_PER_ROW,
                record.len()
            ),
        });
    }

    let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
    let (title, kind, value, category) = (cell(0), cell(1), cell(2), cell(3));

    if title.is_empty() || kind.is_empty() || value.is_empty() {
        debug!(line, "dropping row with blank title, type or value");
        return RowOutcome::Blank;
    }

    let kind = match kind.parse::<TransactionType>() {
        Ok(kind) => kind,
        Err(reason) => return RowOutcome::Malformed(SkippedRow { line, reason }),
    };

    let value = match Money::parse(value) {
        Ok(value) => value,
        Err(e) => {
            return RowOutcome::Malformed(SkippedRow {
                line,
                reason: e.to_string(),
            })
        }
    };

    let category_len = category.chars().count();
    if category_len > MAX_TITLE_LEN {
        return RowOutcome::Malformed(SkippedRow {
            line,
            reason: format!(
                "category title too long ({} chars, max {})",
                category_len, MAX_TITLE_LEN
            ),
        });
    }

    RowOutcome::Accepted(CsvTransaction {
        line,
        title: title.to_string(),
        kind,
        value,
        category: category.to_string(),
    })
}
