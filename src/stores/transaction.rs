//! Defines the transaction store trait.

use crate::{
    Error,
    models::{NewTransaction, Transaction},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&mut self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Create many transactions in one batch write.
    ///
    /// Either every transaction is persisted or none are.
    fn create_many(&mut self, transactions: Vec<NewTransaction>) -> Result<Vec<Transaction>, Error>;

    /// Retrieve all transactions in creation order.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;
}
