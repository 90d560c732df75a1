//! Display formatting for terminal output
//!
//! Plain-text tables for transactions, categories and import summaries.
//! Amounts are rendered with the configured currency symbol.

pub mod category;
pub mod import;
pub mod transaction;

pub use category::format_category_usage;
pub use import::format_import_report;
pub use transaction::{format_balance, format_transaction_list, format_transaction_row};

/// Fit `s` into exactly `width` columns, marking cut text with "..."
pub(crate) fn fit(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        format!("{:width$}", s, width = width)
    } else if width <= 3 {
        ".".repeat(width)
    } else {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("Food", 6), "Food  ");
        assert_eq!(fit("Groceries and more", 10), "Groceri...");
        assert_eq!(fit("Café au lait", 7), "Café...");
        assert_eq!(fit("abc", 2), "..");
    }
}
