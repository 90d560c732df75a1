use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pocketbook::cli::{
    handle_audit_command, handle_category_command, handle_import_command,
    handle_transaction_command, CategoryCommands, TransactionCommands,
};
use pocketbook::config::{PocketbookPaths, Settings};
use pocketbook::logging::init_cli_logger;
use pocketbook::storage::init::needs_initialization;
use pocketbook::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "pocketbook",
    version,
    about = "Personal finance ledger with CSV import",
    long_about = "Pocketbook keeps a ledger of income and outcome transactions. \
                  Import bank exports as CSV (title,type,value,category); categories \
                  are matched by title and created only when missing."
)]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Import transactions from a CSV file (the file is removed afterwards)
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Abort on the first malformed row instead of skipping it
        #[arg(long)]
        fail_fast: bool,
    },

    /// Transaction commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Category commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let paths = PocketbookPaths::new()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Pocketbook at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'pocketbook import <FILE>' to load transactions.");
        }
        Some(Commands::Import { file, fail_fast }) => {
            let (settings, storage) = open(&paths)?;
            handle_import_command(&storage, &settings, &file, fail_fast)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let (settings, storage) = open(&paths)?;
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let (_, storage) = open(&paths)?;
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let (_, storage) = open(&paths)?;
            handle_audit_command(&storage, limit)?;
        }
        Some(Commands::Config) => {
            let settings = Settings::load_or_create(&paths)?;
            println!("Pocketbook Configuration");
            println!("========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Categories file:   {}", paths.categories_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Malformed CSV rows: {:?}", settings.import.malformed_rows);
        }
        None => {
            println!("Pocketbook - personal finance ledger");
            println!();
            println!("Run 'pocketbook --help' for usage information.");
        }
    }

    Ok(())
}

/// Load settings and storage for commands that read or write the ledger
///
/// A first run creates the data files and default settings.
fn open(paths: &PocketbookPaths) -> Result<(Settings, Storage)> {
    if needs_initialization(paths) {
        initialize_storage(paths)?;
    }

    let settings = Settings::load_or_create(paths)?;
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    Ok((settings, storage))
}
