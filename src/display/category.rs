//! Category display formatting

use super::fit;
use crate::services::CategoryUsage;

const TITLE_WIDTH: usize = 30;

/// Format categories with their transaction counts
pub fn format_category_usage(usage: &[CategoryUsage], uncategorized: usize) -> String {
    if usage.is_empty() {
        return "No categories found.\n\nCategories are created by 'pocketbook import'.\n"
            .to_string();
    }

    let mut output = format!("{:12}  {}  {:>6}\n", "ID", fit("Title", TITLE_WIDTH), "Count");
    output.push_str(&"-".repeat(12 + TITLE_WIDTH + 6 + 4));
    output.push('\n');

    for entry in usage {
        output.push_str(&format!(
            "{}  {}  {:>6}\n",
            entry.category.id,
            fit(&entry.category.title, TITLE_WIDTH),
            entry.transaction_count
        ));
    }

    if uncategorized > 0 {
        output.push_str(&format!(
            "{:12}  {}  {:>6}\n",
            "",
            fit("(uncategorized)", TITLE_WIDTH),
            uncategorized
        ));
    }

    output
}
