//! Stable top-K selection over accumulated groups.
//!
//! Groups rank by sum, largest first. Equal sums rank by first occurrence in `T1`, earliest
//! first. Sums compare with [`f64::total_cmp`], so `-0.0` ranks below `0.0` and a positive
//! `NaN` ranks above everything. Both zeros print as `0.000000`, so an earlier group summing to
//! `-0.0` can appear after a later group summing to `0.0` with identical output lines.

use crate::accumulate::Group;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Number of groups the query reports.
pub const DEFAULT_LIMIT: usize = 10;

/// Output order of two groups: `Less` means `a` is reported before `b`.
#[must_use]
pub fn rank_order(a: &Group, b: &Group) -> Ordering {
    b.sum
        .total_cmp(&a.sum)
        .then_with(|| a.first_seen.cmp(&b.first_seen))
}

/// A group ordered by rank; the greatest `Ranked` is the best group.
#[derive(Clone, Copy, Debug)]
struct Ranked(Group);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&other.0, &self.0)
    }
}

/// Keeps the best **K** groups.
///
/// A min-heap (`BinaryHeap<Reverse<_>>`) of size ≤ `k` holds the current winners, so memory
/// is bounded by `k` regardless of the number of groups.
#[derive(Clone, Copy, Debug)]
pub struct TopK {
    pub k: usize,
}

impl Default for TopK {
    fn default() -> Self {
        Self { k: DEFAULT_LIMIT }
    }
}

impl TopK {
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self { k }
    }

    /// The best `k` groups in output order.
    pub fn select<I: IntoIterator<Item = Group>>(&self, groups: I) -> Vec<Group> {
        if self.k == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Reverse<Ranked>> =
            BinaryHeap::with_capacity(self.k.saturating_add(1).min(1 << 16));
        for g in groups {
            heap.push(Reverse(Ranked(g)));
            if heap.len() > self.k {
                heap.pop();
            } // drop the worst
        }
        let mut out: Vec<Group> = heap.into_iter().map(|Reverse(Ranked(g))| g).collect();
        out.sort_by(rank_order);
        out
    }
}
