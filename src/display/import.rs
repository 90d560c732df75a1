//! Import summary formatting

use crate::services::ImportReport;

/// Summarize a finished import
pub fn format_import_report(report: &ImportReport, symbol: &str) -> String {
    let mut output = format!("Imported {} transaction(s).\n", report.transactions.len());

    if !report.created_categories.is_empty() {
        let titles: Vec<&str> = report
            .created_categories
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        output.push_str(&format!("New categories: {}\n", titles.join(", ")));
    }

    if !report.existing_categories.is_empty() {
        output.push_str(&format!(
            "Existing categories used: {}\n",
            report.existing_categories.len()
        ));
    }

    for txn in &report.transactions {
        let category = txn
            .category_id
            .and_then(|id| report.category_title(id))
            .unwrap_or("-");
        output.push_str(&format!(
            "  {} {} {} [{}]\n",
            txn.kind,
            txn.title,
            txn.value.format_with_symbol(symbol),
            category
        ));
    }

    if report.blank_rows > 0 {
        output.push_str(&format!(
            "Ignored {} row(s) with a blank title, type or value.\n",
            report.blank_rows
        ));
    }

    if !report.skipped.is_empty() {
        output.push_str(&format!("Skipped {} malformed row(s):\n", report.skipped.len()));
        for row in &report.skipped {
            output.push_str(&format!("  line {}: {}\n", row.line, row.reason));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, Transaction, TransactionType};
    use crate::services::SkippedRow;

    #[test]
    fn test_format_report() {
        let job = Category::new("Job");
        let report = ImportReport {
            transactions: vec![Transaction::new(
                "Salary",
                TransactionType::Income,
                Money::from_cents(500000),
                Some(job.id),
            )],
            created_categories: vec![job],
            existing_categories: Vec::new(),
            skipped: vec![SkippedRow {
                line: 3,
                reason: "expected 4 cells, found 2".into(),
            }],
            blank_rows: 0,
        };

        let output = format_import_report(&report, "$");
        assert!(output.starts_with("Imported 1 transaction(s)."));
        assert!(output.contains("New categories: Job"));
        assert!(output.contains("income Salary $5000.00 [Job]"));
        assert!(output.contains("line 3: expected 4 cells"));
        assert!(!output.contains("Ignored"));
    }
}
