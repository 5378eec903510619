//! Cashbook is a small ledger for categorized income and outcome
//! transactions.
//!
//! The library is organised around two store traits ([stores::CategoryStore]
//! and [stores::TransactionStore]) with SQLite implementations, and a set of
//! services on top of them: balance calculation, category resolution,
//! transaction creation guarded by the current balance, and bulk import from
//! CSV files.

#![warn(missing_docs)]

pub mod db;
pub mod import;
pub mod models;
pub mod services;
pub mod stores;

pub use db::initialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An outcome transaction would overdraw the ledger.
    ///
    /// Raised before anything is written, so the caller can retry with an
    /// adjusted value.
    #[error("insufficient funds: an outcome of {required} exceeds the current balance of {available}")]
    InsufficientFunds {
        /// The value of the rejected outcome transaction.
        required: i64,
        /// The net balance observed by the guard.
        available: i64,
    },

    /// An empty string was used to create a category title.
    #[error("an empty string is not a valid category title")]
    EmptyCategoryTitle,

    /// A category with the same title already exists in the database.
    ///
    /// The resolver never creates a title twice; this surfaces only when the
    /// UNIQUE constraint is hit by writes that bypassed it.
    #[error("a category with that title already exists in the database")]
    DuplicateCategoryTitle,

    /// The category ID used to create a transaction did not match a valid
    /// category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// A transaction kind other than `income` or `outcome` was given.
    #[error("unknown transaction kind \"{0}\", expected \"income\" or \"outcome\"")]
    UnknownKind(String),

    /// A CSV row could not be turned into a candidate transaction.
    #[error("invalid record on line {line}: {message}")]
    InvalidRecord {
        /// The 1-based line the record started on.
        line: u64,
        /// What was wrong with the record.
        message: String,
    },

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Reading the import file (or deleting it) failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.title") =>
            {
                Error::DuplicateCategoryTitle
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
