//! Transaction display formatting

use std::collections::HashMap;

use super::fit;
use crate::models::{CategoryId, Transaction};
use crate::services::Balance;

const TITLE_WIDTH: usize = 24;
const CATEGORY_WIDTH: usize = 16;

/// Format a single transaction as a table row
pub fn format_transaction_row(txn: &Transaction, category: Option<&str>, symbol: &str) -> String {
    format!(
        "{}  {}  {:7}  {:>12}  {}",
        txn.id,
        fit(&txn.title, TITLE_WIDTH),
        txn.kind.as_str(),
        txn.value.format_with_symbol(symbol),
        fit(category.unwrap_or("-"), CATEGORY_WIDTH).trim_end()
    )
}

/// Format transactions as a table, resolving category titles from `categories`
pub fn format_transaction_list(
    transactions: &[Transaction],
    categories: &HashMap<CategoryId, String>,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = format!(
        "{:12}  {}  {:7}  {:>12}  {}\n",
        "ID",
        fit("Title", TITLE_WIDTH),
        "Type",
        "Value",
        "Category"
    );
    output.push_str(&"-".repeat(12 + TITLE_WIDTH + 7 + 12 + CATEGORY_WIDTH + 8));
    output.push('\n');

    for txn in transactions {
        let category = txn
            .category_id
            .and_then(|id| categories.get(&id))
            .map(String::as_str);
        output.push_str(&format_transaction_row(txn, category, symbol));
        output.push('\n');
    }

    output
}

pub fn format_balance(balance: &Balance, symbol: &str) -> String {
    format!(
        "Income:  {:>14}\nOutcome: {:>14}\nTotal:   {:>14}\n",
        balance.income.format_with_symbol(symbol),
        balance.outcome.format_with_symbol(symbol),
        balance.total.format_with_symbol(symbol)
    )
}
