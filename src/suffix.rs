//! Suffix aggregate: "total weight with key strictly above `t`" in `O(log m)`.
//!
//! Built once, in place, from a buffer of `(key, weight)` rows:
//!
//! 1. sort ascending by key,
//! 2. merge equal keys into the front of the buffer, summing their weights,
//! 3. accumulate right-to-left, so position `i` holds the total weight of every key at or
//!    after `i`.
//!
//! No second buffer is allocated, so building never needs more memory than the rows it
//! consumes. A query binary-searches the first merged key greater than the threshold and reads
//! the precomputed total at that position. Rows with a `NaN` key are dropped while merging,
//! since no comparison against `NaN` can hold.

use crate::runner::ExecMode;
use crate::table::Row;
use log::debug;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuffixAggregate {
    /// Distinct keys, strictly ascending; `weight` is the total weight of rows with key ≥ `key`.
    buckets: Vec<Row>,
}

impl SuffixAggregate {
    /// Build from owned rows, reusing their buffer.
    #[must_use]
    pub fn build(mut rows: Vec<Row>, mode: ExecMode) -> Self {
        let total = rows.len();
        // OrderedFloat sorts NaN last and treats -0.0 and 0.0 as equal. Ordering by weight
        // within a key fixes the summation order regardless of how the sort splits its work.
        let by_key = |r: &Row| (OrderedFloat(r.key), OrderedFloat(r.weight));
        if mode.is_parallel() {
            rows.par_sort_unstable_by_key(by_key);
        } else {
            rows.sort_unstable_by_key(by_key);
        }
        let finite = rows.partition_point(|r| !r.key.is_nan());

        let mut distinct = 0usize;
        for i in 0..finite {
            let Row { key, weight } = rows[i];
            if distinct > 0 && OrderedFloat(rows[distinct - 1].key) == OrderedFloat(key) {
                rows[distinct - 1].weight += weight;
            } else {
                rows[distinct] = Row::new(key, weight);
                distinct += 1;
            }
        }
        rows.truncate(distinct);

        for i in (0..distinct.saturating_sub(1)).rev() {
            let above = rows[i + 1].weight;
            rows[i].weight += above;
        }

        if finite < total {
            debug!("suffix aggregate dropped {} NaN keys", total - finite);
        }
        debug!("suffix aggregate: {finite} rows, {distinct} distinct keys");

        Self { buckets: rows }
    }

    /// Build from table rows (the rows are copied, the table stays untouched).
    #[must_use]
    pub fn from_rows(rows: &[Row], mode: ExecMode) -> Self {
        Self::build(rows.to_vec(), mode)
    }

    /// Position of the first key strictly greater than `threshold`.
    ///
    /// A `NaN` threshold orders above every key, so nothing lies above it.
    #[inline]
    fn first_above(&self, threshold: f64) -> usize {
        let t = OrderedFloat(threshold);
        self.buckets.partition_point(|b| OrderedFloat(b.key) <= t)
    }

    /// Total weight of rows whose key is strictly greater than `threshold`, or `None` when
    /// no key is.
    ///
    /// `Some(0.0)` means at least one row matched and the weights cancelled out.
    #[inline]
    #[must_use]
    pub fn above(&self, threshold: f64) -> Option<f64> {
        self.buckets.get(self.first_above(threshold)).map(|b| b.weight)
    }

    /// Total weight of rows whose key is strictly greater than `threshold`.
    #[inline]
    #[must_use]
    pub fn weight_above(&self, threshold: f64) -> f64 {
        self.above(threshold).unwrap_or(0.0)
    }

    #[must_use]
    pub fn distinct_keys(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
