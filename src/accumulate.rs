//! Streaming join accumulation into per-`a` groups.
//!
//! Both directions evaluate the same predicate against a [`SuffixAggregate`]:
//!
//! - [`accumulate_t1`]: the aggregate holds `b + c` keys; every `T1` row `(a, x)` adds
//!   `x * weight_above(a)` to group `a`.
//! - [`accumulate_pairs`]: the aggregate holds the third table's keys; every combined row
//!   `(a - b, x*y)` adds `x*y * weight_above(a - b)` to group `a`.
//!
//! A group only comes into existence when at least one combination satisfies the predicate
//! for it, even if its contributions sum to zero.

use crate::materialize::CombinedRow;
use crate::runner::{ExecMode, fold_ranges};
use crate::suffix::SuffixAggregate;
use crate::table::Row;
use crate::utils::GroupKey;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// The running state of one group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Group {
    /// The `a` value, exactly as parsed.
    pub key: f64,
    /// Sum of `x * y * z` over every matching combination seen so far.
    pub sum: f64,
    /// Index of the first `T1` row carrying `key`.
    pub first_seen: usize,
}

/// Mapping from `a` to its [`Group`].
///
/// `first_seen` always holds the smallest `T1` row index that contributed to the group, which
/// is the first occurrence of `a` because every row sharing an `a` matches the same `(b, c)`
/// combinations. Merging partial accumulators keeps that minimum.
#[derive(Clone, Debug, Default)]
pub struct GroupAccumulator {
    groups: HashMap<GroupKey, Group>,
}

impl GroupAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `contribution` to group `key`, observed at `T1` row `row`.
    pub fn add(&mut self, key: f64, row: usize, contribution: f64) {
        match self.groups.entry(GroupKey(key)) {
            Entry::Occupied(mut e) => {
                let g = e.get_mut();
                g.sum += contribution;
                g.first_seen = g.first_seen.min(row);
            }
            Entry::Vacant(e) => {
                e.insert(Group {
                    key,
                    sum: contribution,
                    first_seen: row,
                });
            }
        }
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: Self) {
        if self.groups.is_empty() {
            *self = other;
            return;
        }
        for (k, g) in other.groups {
            match self.groups.entry(k) {
                Entry::Occupied(mut e) => {
                    let mine = e.get_mut();
                    mine.sum += g.sum;
                    mine.first_seen = mine.first_seen.min(g.first_seen);
                }
                Entry::Vacant(e) => {
                    e.insert(g);
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: f64) -> Option<&Group> {
        self.groups.get(&GroupKey(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume into groups, in no particular order.
    pub fn into_groups(self) -> impl Iterator<Item = Group> {
        self.groups.into_values()
    }
}

/// Stream `T1` against an aggregate over `b + c`.
#[must_use]
pub fn accumulate_t1(t1: &[Row], aggregate: &SuffixAggregate, mode: ExecMode) -> GroupAccumulator {
    if aggregate.is_empty() {
        return GroupAccumulator::new();
    }
    fold_ranges(
        t1,
        mode,
        GroupAccumulator::new,
        |acc, i, row| {
            if let Some(weight) = aggregate.above(row.key) {
                acc.add(row.key, i, row.weight * weight);
            }
        },
        GroupAccumulator::merge,
    )
}

/// Stream materialized `T1 x T2` (or `T1 x T3`) rows against an aggregate over the third table.
#[must_use]
pub fn accumulate_pairs(
    t1: &[Row],
    pairs: &[CombinedRow],
    aggregate: &SuffixAggregate,
    mode: ExecMode,
) -> GroupAccumulator {
    if aggregate.is_empty() {
        return GroupAccumulator::new();
    }
    fold_ranges(
        pairs,
        mode,
        GroupAccumulator::new,
        |acc, _, pair| {
            let origin = pair.group as usize;
            let (Some(row), Some(weight)) = (t1.get(origin), aggregate.above(pair.key)) else {
                return;
            };
            acc.add(row.key, origin, pair.weight * weight);
        },
        GroupAccumulator::merge,
    )
}
