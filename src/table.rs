//! In-memory tables and rows.
//!
//! Every table in the query has the same shape: an ordered list of `(key, weight)` rows.
//! The three tables only differ in the role they play:
//!
//! | table | key column | weight column |
//! |-------|------------|---------------|
//! | `T1`  | `a`        | `x`           |
//! | `T2`  | `b`        | `y`           |
//! | `T3`  | `c`        | `z`           |
//!
//! Row order is preserved exactly as loaded. It only matters for `T1`, where the position of
//! the first row carrying a given `a` decides ties in the final ranking.

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// The largest number of rows a table may hold.
///
/// Combined rows refer back to their originating `T1` row with a `u32` index.
pub const MAX_TABLE_ROWS: usize = u32::MAX as usize;

/// One `(key, weight)` row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Row {
    /// First column (`a`, `b` or `c`).
    pub key: f64,
    /// Second column (`x`, `y` or `z`).
    pub weight: f64,
}

impl Row {
    #[must_use]
    pub const fn new(key: f64, weight: f64) -> Self {
        Self { key, weight }
    }
}

impl From<(f64, f64)> for Row {
    fn from((key, weight): (f64, f64)) -> Self {
        Self { key, weight }
    }
}

/// Identifies one of the three input tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TableId {
    T1,
    T2,
    T3,
}

impl TableId {
    /// All tables in declaration order.
    pub const ALL: [Self; 3] = [Self::T1, Self::T2, Self::T3];

    /// Position of this table in `[T1, T2, T3]`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::T1 => 0,
            Self::T2 => 1,
            Self::T3 => 2,
        }
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        let name = match self {
            Self::T1 => "T1",
            Self::T2 => "T2",
            Self::T3 => "T3",
        };
        f.write_str(name)
    }
}

/// An ordered, read-only sequence of rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub const fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from `(key, weight)` tuples.
    pub fn from_pairs<I: IntoIterator<Item = (f64, f64)>>(pairs: I) -> Self {
        Self {
            rows: pairs.into_iter().map(Row::from).collect(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

/// The three query inputs, loaded and ready.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tables {
    pub t1: Table,
    pub t2: Table,
    pub t3: Table,
}

impl Tables {
    #[must_use]
    pub const fn new(t1: Table, t2: Table, t3: Table) -> Self {
        Self { t1, t2, t3 }
    }

    #[must_use]
    pub const fn get(&self, id: TableId) -> &Table {
        match id {
            TableId::T1 => &self.t1,
            TableId::T2 => &self.t2,
            TableId::T3 => &self.t3,
        }
    }

    /// Row counts indexed by [`TableId::index`].
    #[must_use]
    pub fn counts(&self) -> [usize; 3] {
        [self.t1.len(), self.t2.len(), self.t3.len()]
    }

    /// `true` when any input has no rows, which makes the whole join empty.
    #[must_use]
    pub fn any_empty(&self) -> bool {
        self.t1.is_empty() || self.t2.is_empty() || self.t3.is_empty()
    }
}
