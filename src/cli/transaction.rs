//! Transaction CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_balance, format_transaction_list};
use crate::error::{PocketbookError, PocketbookResult};
use crate::services::{CategoryService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        /// Only show transactions in this category (title or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Permanently delete a transaction
    Delete {
        /// Transaction ID (txn-<uuid> or bare uuid)
        id: String,
    },

    /// Show income, outcome and total
    Balance,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> PocketbookResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::List { category, limit } => {
            let category_service = CategoryService::new(storage);

            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(identifier) = category {
                let found = category_service
                    .find(&identifier)?
                    .ok_or_else(|| PocketbookError::category_not_found(&identifier))?;
                filter = filter.category(found.id);
            }

            let titles: HashMap<_, _> = category_service
                .list()?
                .into_iter()
                .map(|c| (c.id, c.title))
                .collect();

            print!(
                "{}",
                format_transaction_list(&service.list(filter)?, &titles, symbol)
            );
        }

        TransactionCommands::Delete { id } => {
            let removed = service.delete(&id)?;
            println!(
                "Deleted transaction {} ({}, {})",
                removed.id,
                removed.title,
                removed.value.format_with_symbol(symbol)
            );
        }

        TransactionCommands::Balance => {
            print!("{}", format_balance(&service.balance()?, symbol));
        }
    }

    Ok(())
}
