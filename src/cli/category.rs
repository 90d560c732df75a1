//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_usage;
use crate::error::{PocketbookError, PocketbookResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with transaction counts
    List,

    /// Show category details
    Show {
        /// Category title or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PocketbookResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let usage = service.usage()?;
            print!(
                "{}",
                format_category_usage(&usage, service.uncategorized_count()?)
            );
        }

        CategoryCommands::Show { category } => {
            let found = service
                .find(&category)?
                .ok_or_else(|| PocketbookError::category_not_found(&category))?;
            let count = storage.transactions.get_by_category(found.id)?.len();

            println!("Category:     {}", found.title);
            println!("ID:           {}", found.id.to_full_string());
            println!("Created:      {}", found.created_at.format("%Y-%m-%d %H:%M:%S"));
            println!("Transactions: {}", count);
        }
    }

    Ok(())
}
