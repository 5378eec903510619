//! This file defines the derived `Balance` type.

use serde::{Deserialize, Serialize};

/// The income, outcome and net totals over all persisted transactions.
///
/// A balance is derived data: it is recomputed from the transaction history
/// on every observation and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of all income transaction values.
    pub income: i64,
    /// The sum of all outcome transaction values.
    pub outcome: i64,
    /// `income` minus `outcome`.
    pub net: i64,
}
