//! Computes the ledger balance from the transaction history.

use crate::{
    Error,
    models::{Balance, TransactionKind},
    stores::TransactionStore,
};

/// Aggregates all persisted transactions into income/outcome/net totals.
///
/// The balance is recomputed from the full history on every call. It is used
/// as a guard input by
/// [TransactionFactory](crate::services::TransactionFactory) and never
/// cached.
#[derive(Debug)]
pub struct BalanceCalculator<'a, T> {
    transactions: &'a T,
}

impl<'a, T: TransactionStore> BalanceCalculator<'a, T> {
    /// Create a calculator that reads from `transactions`.
    pub fn new(transactions: &'a T) -> Self {
        Self { transactions }
    }

    /// Fold the full transaction history into a [Balance].
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the history could not be read.
    pub fn compute(&self) -> Result<Balance, Error> {
        let mut balance = Balance::default();

        for transaction in self.transactions.get_all()? {
            match transaction.kind {
                TransactionKind::Income => balance.income += transaction.value,
                TransactionKind::Outcome => balance.outcome += transaction.value,
            }
        }

        balance.net = balance.income - balance.outcome;

        Ok(balance)
    }
}

#[cfg(test)]
mod balance_calculator_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{Balance, CategoryTitle, NewTransaction, TransactionKind},
        stores::{
            CategoryStore, TransactionStore,
            sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
        },
    };

    use super::BalanceCalculator;

    fn get_test_store() -> (SQLiteTransactionStore, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let category = SQLiteCategoryStore::new(connection.clone())
            .create(CategoryTitle::new_unchecked("Misc"))
            .unwrap();

        (SQLiteTransactionStore::new(connection), category.id)
    }

    #[test]
    fn empty_history_has_zero_balance() {
        let (store, _) = get_test_store();

        let balance = BalanceCalculator::new(&store).compute().unwrap();

        assert_eq!(balance, Balance::default());
    }

    #[test]
    fn compute_sums_income_and_outcome_separately() {
        let (mut store, category_id) = get_test_store();

        for (value, kind) in [
            (5000, TransactionKind::Income),
            (50, TransactionKind::Outcome),
            (40, TransactionKind::Outcome),
        ] {
            store
                .create(NewTransaction {
                    title: "Entry".to_string(),
                    value,
                    kind,
                    category_id,
                })
                .unwrap();
        }

        let balance = BalanceCalculator::new(&store).compute().unwrap();

        assert_eq!(
            balance,
            Balance {
                income: 5000,
                outcome: 90,
                net: 4910,
            }
        );
    }
}
