//! A command line front-end for the cashbook ledger.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cashbook::{
    import::ImportOrchestrator,
    initialize,
    services::{BalanceCalculator, TransactionFactory},
    stores::{
        TransactionStore,
        sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
    },
};

/// Track categorized income and outcome transactions in a SQLite ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. Created if it does not exist.
    #[arg(long, short)]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a single transaction.
    Add {
        /// What the transaction was for.
        #[arg(long)]
        title: String,

        /// The amount of money in minor currency units.
        #[arg(long)]
        value: i64,

        /// Either 'income' or 'outcome'.
        #[arg(long)]
        kind: String,

        /// The title of the category, created on first use.
        #[arg(long)]
        category: String,
    },

    /// Bulk-load transactions from a CSV file, then delete the file.
    Import {
        /// The CSV file to import.
        file: PathBuf,
    },

    /// Print the income, outcome and net totals.
    Balance,

    /// Print all transactions and the current balance.
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize(&connection)?;
    let connection = Arc::new(Mutex::new(connection));

    let mut categories = SQLiteCategoryStore::new(connection.clone());
    let mut transactions = SQLiteTransactionStore::new(connection);

    match args.command {
        Command::Add {
            title,
            value,
            kind,
            category,
        } => {
            let kind = kind.parse()?;

            let transaction = TransactionFactory::new(&mut categories, &mut transactions)
                .create(&title, value, kind, &category)?;

            println!("{}", serde_json::to_string_pretty(&transaction)?);
        }
        Command::Import { file } => {
            let outcome =
                ImportOrchestrator::new(&mut categories, &mut transactions).execute(&file)?;

            println!(
                "Imported {} transactions ({} new categories).",
                outcome.transactions.len(),
                outcome.categories_created
            );
        }
        Command::Balance => {
            let balance = BalanceCalculator::new(&transactions).compute()?;

            println!("{}", serde_json::to_string_pretty(&balance)?);
        }
        Command::List => {
            let all = transactions.get_all()?;
            let balance = BalanceCalculator::new(&transactions).compute()?;

            let listing = json!({
                "transactions": all,
                "balance": balance,
            });

            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}
