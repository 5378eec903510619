//! This module defines the domain data types.

pub use balance::Balance;
pub use category::{Category, CategoryTitle};
pub use transaction::{NewTransaction, Transaction, TransactionKind};

mod balance;
mod category;
mod transaction;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
