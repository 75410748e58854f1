//! Join strategy selection.
//!
//! The predicate `a < b + c` touches all three tables, so a naive evaluation enumerates the full
//! three-way product. The planner instead picks one pair of tables to materialize as a cross
//! product and leaves the remaining ("third") table to be streamed against a suffix aggregate:
//!
//! | pairing   | combined key | aggregate over | stream over  | rewrite             |
//! |-----------|--------------|----------------|--------------|---------------------|
//! | `T2 x T3` | `b + c`      | pair           | `T1`         | `b + c > a`         |
//! | `T1 x T2` | `a - b`      | `T3`           | pair         | `c > a - b`         |
//! | `T1 x T3` | `a - c`      | `T2`           | pair         | `b > a - c`         |
//!
//! The smallest pairing that fits the memory budget wins. Equal sizes prefer `T2 x T3`, whose
//! key is computed exactly as the predicate states it, then `T1 x T2`, then `T1 x T3`.

use crate::error::QueryError;
use crate::materialize::CombinedRow;
use crate::table::TableId;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

/// Bytes one materialized pair row occupies at most.
///
/// `T2 x T3` rows drop the `T1` reference and take 16, but every pairing is budgeted alike.
pub const COMBINED_ROW_BYTES: usize = size_of::<CombinedRow>();

/// Which two tables are materialized as a cross product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pairing {
    T2T3,
    T1T2,
    T1T3,
}

/// Which side of the join is scanned row by row against the aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Aggregate the pair (`b + c`), stream `T1` rows and query with `a`.
    StreamT1,
    /// Aggregate the third table, stream pair rows and query with `a - b` or `a - c`.
    StreamPairs,
}

impl Pairing {
    /// All pairings, in tie-break preference order.
    pub const ALL: [Self; 3] = [Self::T2T3, Self::T1T2, Self::T1T3];

    /// The `(outer, inner)` tables of the cross product. When `T1` takes part it is outer.
    #[must_use]
    pub const fn tables(self) -> (TableId, TableId) {
        match self {
            Self::T2T3 => (TableId::T2, TableId::T3),
            Self::T1T2 => (TableId::T1, TableId::T2),
            Self::T1T3 => (TableId::T1, TableId::T3),
        }
    }

    /// The table left out of the cross product.
    #[must_use]
    pub const fn third(self) -> TableId {
        match self {
            Self::T2T3 => TableId::T1,
            Self::T1T2 => TableId::T3,
            Self::T1T3 => TableId::T2,
        }
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::T2T3 => Direction::StreamT1,
            Self::T1T2 | Self::T1T3 => Direction::StreamPairs,
        }
    }

    /// `true` when the pair carries the grouping column `a`.
    #[must_use]
    pub const fn carries_groups(self) -> bool {
        matches!(self.direction(), Direction::StreamPairs)
    }

    /// Combined key of an `(outer, inner)` key pair.
    #[inline]
    #[must_use]
    pub fn combine_keys(self, outer: f64, inner: f64) -> f64 {
        match self {
            Self::T2T3 => outer + inner,
            Self::T1T2 | Self::T1T3 => outer - inner,
        }
    }

    /// Human-readable key formula, e.g. `a - b`.
    #[must_use]
    pub const fn key_formula(self) -> &'static str {
        match self {
            Self::T2T3 => "b + c",
            Self::T1T2 => "a - b",
            Self::T1T3 => "a - c",
        }
    }

    /// Cross-product row count for the given `[n1, n2, n3]`.
    #[must_use]
    pub fn rows(self, counts: [usize; 3]) -> u128 {
        let (outer, inner) = self.tables();
        counts[outer.index()] as u128 * counts[inner.index()] as u128
    }
}

impl Display for Pairing {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        let (outer, inner) = self.tables();
        write!(f, "{outer} x {inner}")
    }
}

impl FromStr for Pairing {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match norm.as_str() {
            "t2t3" | "t2xt3" | "t3t2" | "t3xt2" => Ok(Self::T2T3),
            "t1t2" | "t1xt2" | "t2t1" | "t2xt1" => Ok(Self::T1T2),
            "t1t3" | "t1xt3" | "t3t1" | "t3xt1" => Ok(Self::T1T3),
            _ => Err(QueryError::UnknownPairing(s.to_string())),
        }
    }
}

/// One evaluated pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub pairing: Pairing,
    /// Cross-product row count.
    pub rows: u128,
    /// Bytes the materialized rows would occupy.
    pub bytes: u128,
    /// Whether `bytes` is within the budget.
    pub fits: bool,
}

/// The planner's decision for one query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JoinPlan {
    pub pairing: Pairing,
    /// Every pairing as evaluated, in [`Pairing::ALL`] order.
    pub candidates: [Candidate; 3],
    pub budget_bytes: usize,
    /// `true` when the pairing came from configuration rather than from sizes.
    pub forced: bool,
}

impl JoinPlan {
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.pairing.direction()
    }

    #[must_use]
    pub const fn third(&self) -> TableId {
        self.pairing.third()
    }

    /// The chosen candidate.
    #[must_use]
    pub fn chosen(&self) -> &Candidate {
        self.candidates
            .iter()
            .find(|c| c.pairing == self.pairing)
            .unwrap_or(&self.candidates[0])
    }

    /// One-line summary for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let chosen = self.chosen();
        format!(
            "materialize {} ({} rows, {} bytes) on key {}, stream {:?}{}",
            self.pairing,
            chosen.rows,
            chosen.bytes,
            self.pairing.key_formula(),
            self.direction(),
            if self.forced { " [forced]" } else { "" },
        )
    }
}

impl Display for JoinPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(f, "join plan")?;
        writeln!(f, "  budget:       {} bytes", self.budget_bytes)?;
        writeln!(f, "  candidates:")?;
        for c in &self.candidates {
            let marker = if c.pairing == self.pairing { '*' } else { ' ' };
            writeln!(
                f,
                "   {marker} {:<8} rows={:<14} bytes={:<16} {}",
                c.pairing.to_string(),
                c.rows,
                c.bytes,
                if c.fits { "fits" } else { "over budget" },
            )?;
        }
        writeln!(
            f,
            "  materialize:  {}{}",
            self.pairing,
            if self.forced { " (forced)" } else { "" }
        )?;
        writeln!(f, "  key:          {}", self.pairing.key_formula())?;
        writeln!(f, "  third table:  {}", self.third())?;
        write!(f, "  direction:    {:?}", self.direction())
    }
}

/// Choose the pairing to materialize for tables of `counts = [n1, n2, n3]` rows.
///
/// With `forced = Some(p)`, `p` is used as long as it fits the budget.
///
/// # Errors
/// Returns [`QueryError::NoPairingFits`] when the chosen (or every) pairing exceeds the budget.
pub fn plan(
    counts: [usize; 3],
    budget_bytes: usize,
    forced: Option<Pairing>,
) -> Result<JoinPlan, QueryError> {
    let candidates = Pairing::ALL.map(|pairing| {
        let rows = pairing.rows(counts);
        let bytes = rows.saturating_mul(COMBINED_ROW_BYTES as u128);
        Candidate {
            pairing,
            rows,
            bytes,
            fits: bytes <= budget_bytes as u128,
        }
    });

    let chosen = match forced {
        Some(p) => candidates.iter().find(|c| c.pairing == p),
        None => candidates.iter().filter(|c| c.fits).min_by_key(|c| c.rows),
    };

    match chosen {
        Some(c) if c.fits => Ok(JoinPlan {
            pairing: c.pairing,
            candidates,
            budget_bytes,
            forced: forced.is_some(),
        }),
        _ => {
            let required_bytes = chosen.map_or_else(
                || candidates.iter().map(|c| c.bytes).min().unwrap_or(0),
                |c| c.bytes,
            );
            Err(QueryError::NoPairingFits {
                budget_bytes,
                required_bytes,
            })
        }
    }
}
