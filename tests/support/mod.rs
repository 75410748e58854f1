//! Shared fixtures: deterministic table generators, a cubic reference evaluation, and table
//! file helpers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tribeam::{Group, Table, Tables};

/// Tiny linear congruential generator; deterministic across platforms.
pub struct Lcg(u64);

impl Lcg {
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    /// Value in `lo..=hi` with a fractional part.
    pub fn frac_in(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * f64::from(self.next_u32()) / f64::from(u32::MAX)
    }

    /// Integer in `lo..=hi`, as `f64`.
    pub fn int_in(&mut self, lo: i32, hi: i32) -> f64 {
        let span = (hi - lo + 1) as u32;
        f64::from(lo + (self.next_u32() % span) as i32)
    }
}

/// A table of `n` rows with integer keys in `keys` and integer weights in `weights`.
///
/// Integer-valued data keeps every sum exact, so different evaluation orders agree bit for bit.
/// Positive weights keep every sum away from signed zeros.
pub fn int_table(rng: &mut Lcg, n: usize, keys: (i32, i32), weights: (i32, i32)) -> Table {
    Table::from_pairs((0..n).map(|_| (rng.int_in(keys.0, keys.1), rng.int_in(weights.0, weights.1))))
}

pub fn random_tables(seed: u64, n1: usize, n2: usize, n3: usize) -> Tables {
    let mut rng = Lcg::new(seed);
    Tables::new(
        int_table(&mut rng, n1, (-6, 6), (1, 5)),
        int_table(&mut rng, n2, (-4, 4), (1, 4)),
        int_table(&mut rng, n3, (-4, 4), (1, 3)),
    )
}

/// Straightforward triple loop, ranked with a stable sort over first-occurrence order.
pub fn brute_force(tables: &Tables, limit: usize) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for (i, r1) in tables.t1.rows().iter().enumerate() {
        for r2 in tables.t2.rows() {
            for r3 in tables.t3.rows() {
                if r1.key < r2.key + r3.key {
                    let s = r1.weight * r2.weight * r3.weight;
                    match groups.iter_mut().find(|g| g.key.to_bits() == r1.key.to_bits()) {
                        Some(g) => g.sum += s,
                        None => groups.push(Group {
                            key: r1.key,
                            sum: s,
                            first_seen: i,
                        }),
                    }
                }
            }
        }
    }
    // groups are in first-occurrence order; a stable sort keeps it among equal sums
    groups.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    groups.truncate(limit);
    groups
}

/// Render a table in the file format.
pub fn table_text(pairs: &[(f64, f64)]) -> String {
    let mut s = format!("{}\n", pairs.len());
    for (k, w) in pairs {
        s.push_str(&format!("{k} {w}\n"));
    }
    s
}

pub fn write_table(dir: &Path, name: &str, pairs: &[(f64, f64)]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, table_text(pairs)).expect("write table fixture");
    path
}

/// Write the three tables into `dir` and return their paths.
pub fn write_tables(
    dir: &Path,
    t1: &[(f64, f64)],
    t2: &[(f64, f64)],
    t3: &[(f64, f64)],
) -> (PathBuf, PathBuf, PathBuf) {
    (
        write_table(dir, "t1.txt", t1),
        write_table(dir, "t2.txt", t2),
        write_table(dir, "t3.txt", t3),
    )
}
