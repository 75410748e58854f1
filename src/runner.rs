//! Execution modes and the partitioning helpers shared by the parallel phases.
//!
//! Only three phases of a query ever run in parallel, and each of them is embarrassingly
//! parallel: pair enumeration, the aggregate sort, and the stream scan. The scan is the only
//! one with shared output; it is cut into contiguous ranges whose partial accumulators are
//! merged back in range order, so a given [`ExecMode`] always produces the same result.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExecMode {
    Sequential,
    Parallel {
        /// Size of a dedicated thread pool; `None` uses rayon's global pool.
        threads: Option<usize>,
        /// Number of scan ranges; `None` uses [`DEFAULT_PARTITIONS`].
        partitions: Option<usize>,
    },
}

impl Default for ExecMode {
    fn default() -> Self {
        Self::Parallel {
            threads: None,
            partitions: None,
        }
    }
}

/// Scan ranges used when a parallel mode does not set `partitions`.
///
/// Independent of the host: range boundaries fix the order in which partial sums are added.
pub const DEFAULT_PARTITIONS: usize = 64;

impl ExecMode {
    #[must_use]
    pub const fn is_parallel(self) -> bool {
        matches!(self, Self::Parallel { .. })
    }

    /// Number of scan ranges this mode cuts a stream into (always ≥ 1).
    #[must_use]
    pub fn partitions(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel { partitions, .. } => partitions.unwrap_or(DEFAULT_PARTITIONS).max(1),
        }
    }

    /// Run `f` under this mode.
    ///
    /// With an explicit thread count a dedicated pool is built for the call, so repeated
    /// queries with different settings never fight over rayon's global pool.
    ///
    /// # Errors
    /// Returns an error if the dedicated thread pool cannot be created.
    pub fn install<R, F>(self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self {
            Self::Parallel {
                threads: Some(t), ..
            } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(t.max(1))
                    .build()
                    .with_context(|| format!("build thread pool with {t} threads"))?;
                Ok(pool.install(f))
            }
            _ => Ok(f()),
        }
    }
}

/// Split `[0, len)` into at most `parts` contiguous, non-empty ranges as `(start, end)`.
///
/// The remainder is spread over the leading ranges, so sizes differ by at most one.
#[must_use]
pub fn split_ranges(len: usize, parts: usize) -> Vec<(usize, usize)> {
    let parts = parts.max(1).min(len.max(1));
    let base = len / parts;
    let rem = len % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0usize;
    for idx in 0..parts {
        let extra = usize::from(idx < rem);
        let end = start + base + extra;
        if start < end {
            out.push((start, end));
        }
        start = end;
    }
    out
}

/// Fold `items` into per-range partial results, then merge the partials in range order.
///
/// `fold` receives the absolute index of each item. In sequential mode there is exactly one
/// range and no merge.
pub fn fold_ranges<T, A, I, F, M>(items: &[T], mode: ExecMode, init: I, fold: F, merge: M) -> A
where
    T: Sync,
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(&mut A, usize, &T) + Sync,
    M: Fn(&mut A, A),
{
    let scan = |(start, end): (usize, usize)| {
        let mut acc = init();
        for (offset, item) in items[start..end].iter().enumerate() {
            fold(&mut acc, start + offset, item);
        }
        acc
    };

    if !mode.is_parallel() {
        return scan((0, items.len()));
    }

    let partials: Vec<A> = split_ranges(items.len(), mode.partitions())
        .into_par_iter()
        .map(scan)
        .collect();

    let mut parts = partials.into_iter();
    let mut acc = parts.next().unwrap_or_else(&init);
    for part in parts {
        merge(&mut acc, part);
    }
    acc
}
