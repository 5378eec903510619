//! Bulk import of transactions from CSV files.

use std::{fs, fs::File, path::Path};

use crate::{
    Error,
    models::{DatabaseID, Transaction},
    services::{CategoryResolver, TransactionFactory},
    stores::{CategoryStore, TransactionStore},
};

mod ingest;

pub use ingest::{ImportRecord, RowIngestor};

/// What an import run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// The persisted transactions, in file order.
    pub transactions: Vec<Transaction>,
    /// How many categories the import had to create.
    pub categories_created: usize,
}

/// Drives a whole import: ingest the file, resolve categories in one batch,
/// persist the transactions in one batch, then remove the source file.
///
/// Every row is read before anything is written, so a malformed row or a
/// stream failure aborts the import with the stores untouched. If the
/// transaction batch write fails after categories were created, the orphan
/// categories are deleted again so a failed import leaves no trace.
#[derive(Debug)]
pub struct ImportOrchestrator<'a, C, T> {
    categories: &'a mut C,
    transactions: &'a mut T,
}

impl<'a, C: CategoryStore, T: TransactionStore> ImportOrchestrator<'a, C, T> {
    /// Create an orchestrator over the two stores.
    pub fn new(categories: &'a mut C, transactions: &'a mut T) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Import the CSV file at `path` and delete it afterwards.
    ///
    /// The file is deleted only once every transaction is durably persisted.
    /// A deletion failure is logged and otherwise ignored, since the import
    /// itself has already succeeded at that point.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be opened or read,
    /// [Error::InvalidRecord] if a row is malformed, or an error from the
    /// stores. No categories or transactions are left behind on error.
    pub fn execute(&mut self, path: &Path) -> Result<ImportOutcome, Error> {
        let file = File::open(path)?;

        let mut records = Vec::new();
        let mut titles = Vec::new();

        for record in RowIngestor::new(file) {
            let record = record?;
            titles.push(record.category.clone());
            records.push(record);
        }

        let resolution = CategoryResolver::new(&mut *self.categories).resolve_batch(&titles)?;

        let result = TransactionFactory::new(&mut *self.categories, &mut *self.transactions)
            .create_batch(records, &resolution);

        let transactions = match result {
            Ok(transactions) => transactions,
            Err(error) => {
                self.remove_orphan_categories(resolution.created_ids());
                return Err(error);
            }
        };

        if let Err(error) = fs::remove_file(path) {
            tracing::warn!(
                "could not remove imported file {}: {error}",
                path.display()
            );
        }

        tracing::info!(
            "imported {} transactions ({} new categories) from {}",
            transactions.len(),
            resolution.created_count(),
            path.display()
        );

        Ok(ImportOutcome {
            transactions,
            categories_created: resolution.created_count(),
        })
    }

    /// Delete the categories created by a failed import.
    ///
    /// Failures are logged rather than surfaced so the original import error
    /// reaches the caller.
    fn remove_orphan_categories(&mut self, ids: &[DatabaseID]) {
        for &id in ids {
            if let Err(error) = self.categories.delete(id) {
                tracing::warn!("could not remove orphan category {id}: {error}");
            }
        }
    }
}
