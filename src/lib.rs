//! # Tribeam
//!
//! Evaluates one fixed analytical query over three in-memory tables
//! `T1(a, x)`, `T2(b, y)`, `T3(c, z)`:
//!
//! ```text
//! SELECT a, SUM(x * y * z) AS s
//! FROM t1 JOIN t2 JOIN t3
//! WHERE a < b + c
//! GROUP BY a
//! STABLE ORDER BY s DESC
//! LIMIT 10
//! ```
//!
//! `STABLE` means equal sums are ordered by the row at which each `a` first appears in `T1`.
//!
//! ## How it works
//!
//! Tables may hold up to a million rows each, so the three-way product is out of reach. At
//! least one pairwise product is assumed to fit in memory, and the query is evaluated as:
//!
//! 1. **Plan** ([`planner`]) -- pick the smallest pair (`T2 x T3`, `T1 x T2` or `T1 x T3`)
//!    that fits the memory budget.
//! 2. **Materialize** ([`materialize`]) -- enumerate that pair's cross product into rows of
//!    `(combined key, weight product)`.
//! 3. **Aggregate** ([`suffix`]) -- sort whichever side is not streamed and precompute suffix
//!    sums, so "total weight with key above `t`" is one binary search.
//! 4. **Accumulate** ([`accumulate`]) -- stream the other side against the aggregate,
//!    using `a < b + c ⇔ b + c > a ⇔ c > a - b ⇔ b > a - c`, and sum per group.
//! 5. **Rank** ([`topk`]) -- keep the best ten groups with an explicit, stable comparator.
//!
//! ## Quick Start
//!
//! ```no_run
//! # use anyhow::Result;
//! # fn main() -> Result<()> {
//! tribeam::select("t1.txt", "t2.txt", "t3.txt", "out.txt")?;
//! # Ok(())
//! # }
//! ```
//!
//! Or over tables already in memory:
//!
//! ```
//! use tribeam::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let tables = Tables::new(
//!     Table::from_pairs([(1.0, 2.0)]),
//!     Table::from_pairs([(1.0, 3.0)]),
//!     Table::from_pairs([(1.0, 4.0)]),
//! );
//! let out = ThresholdJoinQuery::new(QueryConfig::sequential()).run(&tables)?;
//! assert_eq!(out.groups.len(), 1);
//! assert_eq!(out.groups[0].sum, 24.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Execution Modes
//!
//! [`ExecMode::Sequential`] runs single-threaded. [`ExecMode::Parallel`] (the default) uses
//! Rayon for pair enumeration, the aggregate sort and the stream scan. The scan's partial
//! results are merged in a fixed order, so output is deterministic for a given configuration.
//!
//! ## Module Overview
//!
//! - [`table`] - rows, tables and table identities
//! - [`io`] - table file reader and result writer
//! - [`planner`] - pairing selection under a memory budget
//! - [`materialize`] - cross-product enumeration
//! - [`suffix`] - suffix-sum aggregate with logarithmic threshold queries
//! - [`accumulate`] - streaming per-group accumulation
//! - [`topk`] - stable top-K ranking
//! - [`query`] - end-to-end evaluation and the `select` entry points
//! - [`metrics`] - per-run statistics

pub mod accumulate;
pub mod config;
pub mod error;
pub mod io;
pub mod materialize;
pub mod metrics;
pub mod planner;
pub mod query;
pub mod runner;
pub mod suffix;
pub mod table;
pub mod topk;
pub mod utils;

pub use accumulate::{Group, GroupAccumulator};
pub use config::QueryConfig;
pub use error::QueryError;
pub use metrics::QueryStats;
pub use planner::{Direction, JoinPlan, Pairing};
pub use query::{QueryOutput, ThresholdJoinQuery, select, select_with};
pub use runner::ExecMode;
pub use suffix::SuffixAggregate;
pub use table::{Row, Table, TableId, Tables};
pub use topk::TopK;
