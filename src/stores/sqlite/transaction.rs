//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewTransaction, Transaction},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction references a
/// [Category](crate::models::Category), the category table must be set up in
/// the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const INSERT_TRANSACTION: &str =
    "INSERT INTO \"transaction\" (title, value, kind, category_id, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)
     RETURNING id, title, value, kind, category_id, created_at";

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if `category_id` does not refer to a
    /// valid category, or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let transaction = connection
            .prepare(INSERT_TRANSACTION)?
            .query_row(
                (
                    transaction.title,
                    transaction.value,
                    transaction.kind,
                    transaction.category_id,
                    OffsetDateTime::now_utc(),
                ),
                Self::map_row,
            )
            .map_err(map_insert_error)?;

        Ok(transaction)
    }

    /// Create many transactions inside a single SQL transaction.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if any `category_id` does not refer
    /// to a valid category, or [Error::SqlError] if there is some other SQL
    /// error. No transaction is persisted on error.
    fn create_many(&mut self, transactions: Vec<NewTransaction>) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().unwrap();
        let tx = connection.unchecked_transaction()?;

        let mut created = Vec::with_capacity(transactions.len());

        {
            let mut statement = tx.prepare(INSERT_TRANSACTION)?;

            for transaction in transactions {
                let transaction = statement
                    .query_row(
                        (
                            transaction.title,
                            transaction.value,
                            transaction.kind,
                            transaction.category_id,
                            OffsetDateTime::now_utc(),
                        ),
                        Self::map_row,
                    )
                    .map_err(map_insert_error)?;

                created.push(transaction);
            }
        }

        tx.commit()?;

        Ok(created)
    }

    /// Retrieve all transactions in creation order.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, title, value, kind, category_id, created_at
                 FROM \"transaction\" ORDER BY id;",
            )?
            .query_map([], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }
}

fn map_insert_error(error: rusqlite::Error) -> Error {
    match error {
        // Code 787 occurs when a FOREIGN KEY constraint failed.
        // The caller tried to add a transaction for a non-existent category.
        rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
            Error::InvalidCategory
        }
        error => error.into(),
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                value INTEGER NOT NULL,
                kind TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id)
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            title: row.get(offset + 1)?,
            value: row.get(offset + 2)?,
            kind: row.get(offset + 3)?,
            category_id: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
        })
    }
}
