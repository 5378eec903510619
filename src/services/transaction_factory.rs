//! Validated construction of transactions, guarded by the ledger balance.

use crate::{
    Error,
    import::ImportRecord,
    models::{NewTransaction, Transaction, TransactionKind},
    services::{BalanceCalculator, BatchResolution, CategoryResolver},
    stores::{CategoryStore, TransactionStore},
};

/// Builds and persists transactions.
///
/// The single-create path enforces the solvency guard: an outcome transaction
/// may not exceed the current net balance. The factory holds exclusive
/// mutable borrows of both stores for its lifetime, so the balance read and
/// the subsequent write cannot interleave with another create in the same
/// process.
///
/// The batch path applies no guard: imports are treated as batch-authoritative
/// records of events that already happened.
#[derive(Debug)]
pub struct TransactionFactory<'a, C, T> {
    categories: &'a mut C,
    transactions: &'a mut T,
}

impl<'a, C: CategoryStore, T: TransactionStore> TransactionFactory<'a, C, T> {
    /// Create a factory over the two stores.
    pub fn new(categories: &'a mut C, transactions: &'a mut T) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Validate and persist one transaction.
    ///
    /// For an outcome transaction the current balance is computed first and
    /// the call fails with [Error::InsufficientFunds] when `value` exceeds
    /// the net balance, before any write happens. The category is then
    /// resolved by title, created if needed.
    ///
    /// # Errors
    /// Returns [Error::InsufficientFunds] if the solvency guard rejects the
    /// transaction, [Error::EmptyCategoryTitle] if `category` is empty, or an
    /// error from the stores.
    pub fn create(
        &mut self,
        title: &str,
        value: i64,
        kind: TransactionKind,
        category: &str,
    ) -> Result<Transaction, Error> {
        if kind == TransactionKind::Outcome {
            let balance = BalanceCalculator::new(&*self.transactions).compute()?;

            if value > balance.net {
                return Err(Error::InsufficientFunds {
                    required: value,
                    available: balance.net,
                });
            }
        }

        let category = CategoryResolver::new(&mut *self.categories).resolve_or_create(category)?;

        self.transactions.create(NewTransaction {
            title: title.to_string(),
            value,
            kind,
            category_id: category.id,
        })
    }

    /// Build and persist every record in `records` with one batch write.
    ///
    /// Each record's category title is looked up in `resolution`, which must
    /// cover every title that appears in `records`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if a record's category title is missing from
    /// `resolution`, or an error from the store. Nothing is persisted on
    /// error.
    pub fn create_batch(
        &mut self,
        records: Vec<ImportRecord>,
        resolution: &BatchResolution,
    ) -> Result<Vec<Transaction>, Error> {
        let mut drafts = Vec::with_capacity(records.len());

        for record in records {
            let category = resolution.get(&record.category).ok_or(Error::NotFound)?;

            drafts.push(NewTransaction {
                title: record.title,
                value: record.value,
                kind: record.kind,
                category_id: category.id,
            });
        }

        self.transactions.create_many(drafts)
    }
}

#[cfg(test)]
mod transaction_factory_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        import::ImportRecord,
        models::TransactionKind,
        services::{BalanceCalculator, CategoryResolver},
        stores::{
            CategoryStore, TransactionStore,
            sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
        },
    };

    use super::TransactionFactory;

    fn get_test_stores() -> (SQLiteCategoryStore, SQLiteTransactionStore) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        (
            SQLiteCategoryStore::new(connection.clone()),
            SQLiteTransactionStore::new(connection),
        )
    }

    #[test]
    fn create_income_needs_no_funds() {
        let (mut categories, mut transactions) = get_test_stores();
        let mut factory = TransactionFactory::new(&mut categories, &mut transactions);

        let transaction = factory
            .create("Salary", 5000, TransactionKind::Income, "Job")
            .unwrap();

        assert_eq!(transaction.value, 5000);
        assert_eq!(transaction.kind, TransactionKind::Income);
    }

    #[test]
    fn create_outcome_decreases_net_balance_by_value() {
        let (mut categories, mut transactions) = get_test_stores();
        let mut factory = TransactionFactory::new(&mut categories, &mut transactions);
        factory
            .create("Salary", 5000, TransactionKind::Income, "Job")
            .unwrap();

        factory
            .create("Bus ticket", 50, TransactionKind::Outcome, "Transport")
            .unwrap();

        let balance = BalanceCalculator::new(&transactions).compute().unwrap();
        assert_eq!(balance.net, 4950);
    }

    #[test]
    fn create_outcome_exceeding_balance_fails() {
        let (mut categories, mut transactions) = get_test_stores();
        let mut factory = TransactionFactory::new(&mut categories, &mut transactions);
        factory
            .create("Salary", 100, TransactionKind::Income, "Job")
            .unwrap();

        let result = factory.create("Rent", 101, TransactionKind::Outcome, "Housing");

        assert_eq!(
            result,
            Err(Error::InsufficientFunds {
                required: 101,
                available: 100,
            })
        );
    }

    #[test]
    fn rejected_outcome_persists_no_category_and_no_transaction() {
        let (mut categories, mut transactions) = get_test_stores();
        let mut factory = TransactionFactory::new(&mut categories, &mut transactions);

        let result = factory.create("Rent", 1, TransactionKind::Outcome, "Housing");

        assert!(matches!(result, Err(Error::InsufficientFunds { .. })));
        assert_eq!(categories.find_by_title("Housing").unwrap(), None);
        assert_eq!(transactions.get_all().unwrap(), vec![]);
    }

    #[test]
    fn create_outcome_spending_exact_balance_succeeds() {
        let (mut categories, mut transactions) = get_test_stores();
        let mut factory = TransactionFactory::new(&mut categories, &mut transactions);
        factory
            .create("Salary", 100, TransactionKind::Income, "Job")
            .unwrap();

        let transaction = factory.create("Rent", 100, TransactionKind::Outcome, "Housing");

        assert!(transaction.is_ok());

        let balance = BalanceCalculator::new(&transactions).compute().unwrap();
        assert_eq!(balance.net, 0);
    }

    #[test]
    fn create_reuses_existing_category() {
        let (mut categories, mut transactions) = get_test_stores();
        let mut factory = TransactionFactory::new(&mut categories, &mut transactions);

        let first = factory
            .create("Salary", 5000, TransactionKind::Income, "Job")
            .unwrap();
        let second = factory
            .create("Bonus", 500, TransactionKind::Income, "Job")
            .unwrap();

        assert_eq!(first.category_id, second.category_id);
    }

    #[test]
    fn create_batch_applies_no_solvency_guard() {
        let (mut categories, mut transactions) = get_test_stores();

        let titles = vec!["Transport".to_string()];
        let resolution = CategoryResolver::new(&mut categories)
            .resolve_batch(&titles)
            .unwrap();

        let records = vec![ImportRecord {
            title: "Bus ticket".to_string(),
            kind: TransactionKind::Outcome,
            value: 50,
            category: "Transport".to_string(),
        }];

        let created = TransactionFactory::new(&mut categories, &mut transactions)
            .create_batch(records, &resolution)
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].kind, TransactionKind::Outcome);
    }

    #[test]
    fn create_batch_fails_on_unresolved_category() {
        let (mut categories, mut transactions) = get_test_stores();

        let resolution = CategoryResolver::new(&mut categories)
            .resolve_batch(&[])
            .unwrap();

        let records = vec![ImportRecord {
            title: "Bus ticket".to_string(),
            kind: TransactionKind::Outcome,
            value: 50,
            category: "Transport".to_string(),
        }];

        let result = TransactionFactory::new(&mut categories, &mut transactions)
            .create_batch(records, &resolution);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(transactions.get_all().unwrap(), vec![]);
    }
}
