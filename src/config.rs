//! Query configuration.

use crate::planner::Pairing;
use crate::runner::ExecMode;
use crate::topk::DEFAULT_LIMIT;
use serde::Serialize;

/// Default memory budget for the materialized pair: 8 GiB.
pub const DEFAULT_MEMORY_BUDGET_BYTES: usize = 8 << 30;

/// Settings for one query run.
///
/// ```
/// use tribeam::{ExecMode, Pairing, QueryConfig};
///
/// let cfg = QueryConfig::default()
///     .with_mode(ExecMode::Sequential)
///     .with_memory_budget(1 << 30)
///     .with_forced_pairing(Pairing::T1T2);
/// assert_eq!(cfg.limit, 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QueryConfig {
    pub mode: ExecMode,
    /// Upper bound on bytes the materialized pair may occupy.
    pub memory_budget_bytes: usize,
    /// Number of groups to report.
    pub limit: usize,
    /// Materialize this pairing instead of letting the planner choose.
    pub forced_pairing: Option<Pairing>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            mode: ExecMode::default(),
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET_BYTES,
            limit: DEFAULT_LIMIT,
            forced_pairing: None,
        }
    }
}

impl QueryConfig {
    /// Single-threaded configuration.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_mode(ExecMode::Sequential)
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget_bytes = bytes;
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn with_forced_pairing(mut self, pairing: Pairing) -> Self {
        self.forced_pairing = Some(pairing);
        self
    }
}
