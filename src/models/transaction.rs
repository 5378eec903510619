//! This file defines the `Transaction` type, the core type of the ledger, and
//! the types used to create one.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, models::DatabaseID};

/// Whether a transaction adds money to the ledger or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Outcome,
}

impl TransactionKind {
    /// The lowercase token used in CSV files and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Outcome => "outcome",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "outcome" => Ok(TransactionKind::Outcome),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(error.to_string().into()))
    }
}

/// An event where money was either spent or earned.
///
/// Transactions are created through
/// [TransactionFactory](crate::services::TransactionFactory) and are never
/// mutated after creation. The ID doubles as the creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction. IDs increase in creation order.
    pub id: DatabaseID,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money, a sign-agnostic magnitude in minor currency
    /// units. The sign is carried by `kind`.
    pub value: i64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category_id: DatabaseID,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to persist a new [Transaction].
///
/// The category must already exist; resolving a category title to an ID is
/// the job of [CategoryResolver](crate::services::CategoryResolver).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money in minor currency units.
    pub value: i64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category_id: DatabaseID,
}
