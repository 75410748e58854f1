//! Structured error kinds.
//!
//! Public entry points return [`anyhow::Result`] with file and line context attached. The
//! underlying kind can be recovered with `err.downcast_ref::<QueryError>()`.

use crate::table::TableId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The table file does not follow the `count` + `key weight` line format.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A table has more rows than a combined row can reference.
    #[error("table {table} has {rows} rows, more than the supported {max}")]
    TableTooLarge { table: TableId, rows: usize, max: usize },

    /// None of the pairwise cross products fits the memory budget.
    ///
    /// The input contract guarantees at least one pairing fits, so this is a logic error.
    #[error(
        "no pairwise cross product fits the memory budget of {budget_bytes} bytes \
         (smallest candidate needs {required_bytes} bytes)"
    )]
    NoPairingFits { budget_bytes: usize, required_bytes: u128 },

    /// A pairing name that is not one of `t1t2`, `t2t3`, `t1t3`.
    #[error("unknown pairing `{0}` (expected t1t2, t2t3 or t1t3)")]
    UnknownPairing(String),
}
