//! Cross-product materialization of the chosen pair.
//!
//! `T2 x T3` is written as plain [`Row`]s of `(b + c, y * z)`: it only ever feeds a suffix
//! aggregate, which is then built inside the same buffer. Pairs involving `T1` are written as
//! [`CombinedRow`]s, which also remember the originating `T1` row.

use crate::planner::Pairing;
use crate::runner::ExecMode;
use crate::table::Row;
use rayon::prelude::*;

/// One row of a materialized `T1 x T2` or `T1 x T3` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CombinedRow {
    /// `a - b` or `a - c`, depending on the pairing.
    pub key: f64,
    /// Product of the two weights.
    pub weight: f64,
    /// Index of the originating `T1` row.
    ///
    /// The group value `a` and its row position are both read back from `T1` through it.
    pub group: u32,
}

/// A row type a cross product can be written into.
pub trait PairRow: Copy + Default + Send + Sync {
    /// Build a row from the combined key, the weight product and the outer row index.
    fn pair(key: f64, weight: f64, outer: u32) -> Self;
}

impl PairRow for Row {
    #[inline]
    fn pair(key: f64, weight: f64, _outer: u32) -> Self {
        Self::new(key, weight)
    }
}

impl PairRow for CombinedRow {
    #[inline]
    fn pair(key: f64, weight: f64, outer: u32) -> Self {
        Self {
            key,
            weight,
            group: outer,
        }
    }
}

/// Enumerate `outer x inner` into a preallocated vector, outer-major.
///
/// `outer` must be `T1` whenever `pairing` involves it (see [`Pairing::tables`]), so that the
/// outer index recorded by [`CombinedRow`] is a `T1` row.
#[must_use]
pub fn materialize<E: PairRow>(
    pairing: Pairing,
    outer: &[Row],
    inner: &[Row],
    mode: ExecMode,
) -> Vec<E> {
    if outer.is_empty() || inner.is_empty() {
        return Vec::new();
    }

    let fill = |(i, (chunk, o)): (usize, (&mut [E], &Row))| {
        for (slot, r) in chunk.iter_mut().zip(inner) {
            *slot = E::pair(pairing.combine_keys(o.key, r.key), o.weight * r.weight, i as u32);
        }
    };

    let mut out = vec![E::default(); outer.len() * inner.len()];
    if mode.is_parallel() {
        out.par_chunks_mut(inner.len())
            .zip(outer.par_iter())
            .enumerate()
            .for_each(fill);
    } else {
        out.chunks_mut(inner.len())
            .zip(outer.iter())
            .enumerate()
            .for_each(fill);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(v: &[(f64, f64)]) -> Vec<Row> {
        v.iter().copied().map(Row::from).collect()
    }

    #[test]
    fn t2_t3_sums_keys_into_plain_rows() {
        let out: Vec<Row> = materialize(
            Pairing::T2T3,
            &rows(&[(1.0, 2.0), (3.0, 4.0)]),
            &rows(&[(10.0, 0.5)]),
            ExecMode::Sequential,
        );
        assert_eq!(out, vec![Row::new(11.0, 1.0), Row::new(13.0, 2.0)]);
    }

    #[test]
    fn t1_pairs_subtract_and_tag_rows() {
        let t1 = rows(&[(5.0, 1.0), (7.0, 2.0)]);
        let t3 = rows(&[(1.0, 3.0), (2.0, 5.0)]);
        let seq: Vec<CombinedRow> = materialize(Pairing::T1T3, &t1, &t3, ExecMode::Sequential);
        let par: Vec<CombinedRow> = materialize(Pairing::T1T3, &t1, &t3, ExecMode::default());
        assert_eq!(seq, par);
        assert_eq!(seq.len(), 4);
        assert_eq!(seq[3], CombinedRow { key: 5.0, weight: 10.0, group: 1 });
    }

    #[test]
    fn plain_rows_are_smaller_than_combined_rows() {
        assert_eq!(size_of::<Row>(), 16);
        assert_eq!(size_of::<CombinedRow>(), 24);
    }
}
