//! Run statistics for a single query.
//!
//! [`QueryStats`] records the input sizes, the planner's choice, the sizes of the intermediate
//! structures and how long each phase took. It is logged at the end of every run and can be
//! saved as JSON.
//!
//! ```no_run
//! use tribeam::{QueryConfig, select_with};
//!
//! # fn main() -> anyhow::Result<()> {
//! let stats = select_with(&QueryConfig::default(), "t1.txt", "t2.txt", "t3.txt", "out.txt")?;
//! stats.save_to_file("stats.json")?;
//! # Ok(())
//! # }
//! ```

use crate::planner::{Direction, Pairing};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Wall-clock time spent in each phase, in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTimings {
    pub load_us: u64,
    pub plan_us: u64,
    pub materialize_us: u64,
    pub aggregate_us: u64,
    pub accumulate_us: u64,
    pub rank_us: u64,
    pub write_us: u64,
}

impl PhaseTimings {
    /// Sum of all phases.
    #[must_use]
    pub const fn total_us(&self) -> u64 {
        self.load_us
            + self.plan_us
            + self.materialize_us
            + self.aggregate_us
            + self.accumulate_us
            + self.rank_us
            + self.write_us
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryStats {
    pub t1_rows: usize,
    pub t2_rows: usize,
    pub t3_rows: usize,
    /// `None` when an empty input short-circuited planning.
    pub pairing: Option<Pairing>,
    pub direction: Option<Direction>,
    pub materialized_rows: usize,
    /// Distinct keys in the suffix aggregate.
    pub aggregate_keys: usize,
    /// Groups with at least one matching combination.
    pub groups_found: usize,
    /// Groups in the result.
    pub groups_emitted: usize,
    pub timings: PhaseTimings,
}

impl QueryStats {
    /// Stats for inputs of `counts = [n1, n2, n3]` rows, before anything has run.
    #[must_use]
    pub fn for_counts(counts: [usize; 3]) -> Self {
        Self {
            t1_rows: counts[0],
            t2_rows: counts[1],
            t3_rows: counts[2],
            ..Self::default()
        }
    }

    /// JSON snapshot of all fields.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Save as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .with_context(|| format!("serialize stats to {}", path.display()))?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }

    /// Log a one-line summary at `info`.
    pub fn log_summary(&self) {
        let pairing = self
            .pairing
            .map_or_else(|| "none".to_string(), |p| p.to_string());
        info!(
            "rows {}/{}/{}, pair {}, {} materialized, {} aggregate keys, {} groups, {} emitted, {:.3} ms",
            self.t1_rows,
            self.t2_rows,
            self.t3_rows,
            pairing,
            self.materialized_rows,
            self.aggregate_keys,
            self.groups_found,
            self.groups_emitted,
            self.timings.total_us() as f64 / 1000.0,
        );
    }
}

/// Run `f`, adding its wall-clock time to `slot`.
pub fn timed<R>(slot: &mut u64, f: impl FnOnce() -> R) -> R {
    let start = Instant::now();
    let out = f();
    *slot += micros(start.elapsed());
    out
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
