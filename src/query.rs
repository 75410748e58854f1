//! Query evaluation: plan, materialize, aggregate, accumulate, rank.
//!
//! ```text
//! SELECT a, SUM(x * y * z) AS s
//! FROM t1 JOIN t2 JOIN t3
//! WHERE a < b + c
//! GROUP BY a
//! STABLE ORDER BY s DESC
//! LIMIT 10
//! ```

use crate::accumulate::{Group, GroupAccumulator, accumulate_pairs, accumulate_t1};
use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::io::{read_table, write_ranked};
use crate::materialize::{CombinedRow, PairRow, materialize};
use crate::metrics::{QueryStats, timed};
use crate::planner::{Direction, JoinPlan, plan};
use crate::suffix::SuffixAggregate;
use crate::table::{MAX_TABLE_ROWS, Row, TableId, Tables};
use crate::topk::TopK;
use anyhow::Result;
use log::{debug, info};
use std::path::Path;

/// Ranked groups plus the statistics of the run that produced them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOutput {
    pub groups: Vec<Group>,
    pub stats: QueryStats,
}

/// The fixed three-table threshold join.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThresholdJoinQuery {
    pub config: QueryConfig,
}

impl ThresholdJoinQuery {
    #[must_use]
    pub const fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Plan the query for `tables` without running it.
    ///
    /// # Errors
    /// Returns [`QueryError::NoPairingFits`] if no pairing fits the memory budget.
    pub fn plan(&self, tables: &Tables) -> Result<JoinPlan, QueryError> {
        plan(
            tables.counts(),
            self.config.memory_budget_bytes,
            self.config.forced_pairing,
        )
    }

    /// Evaluate the query over loaded tables.
    ///
    /// # Errors
    /// Returns an error if a table is too large to index, if no pairing fits the memory
    /// budget, or if a dedicated thread pool cannot be created.
    pub fn run(&self, tables: &Tables) -> Result<QueryOutput> {
        let mut stats = QueryStats::for_counts(tables.counts());

        if tables.any_empty() {
            info!("an input table is empty; the result is empty");
            return Ok(QueryOutput {
                groups: Vec::new(),
                stats,
            });
        }
        for id in TableId::ALL {
            let rows = tables.get(id).len();
            if rows > MAX_TABLE_ROWS {
                return Err(QueryError::TableTooLarge {
                    table: id,
                    rows,
                    max: MAX_TABLE_ROWS,
                }
                .into());
            }
        }

        let plan = timed(&mut stats.timings.plan_us, || self.plan(tables))?;
        info!("{}", plan.summary());
        debug!("{plan}");
        stats.pairing = Some(plan.pairing);
        stats.direction = Some(plan.direction());

        let acc = self
            .config
            .mode
            .install(|| self.evaluate(&plan, tables, &mut stats))?;
        stats.groups_found = acc.len();

        let groups = timed(&mut stats.timings.rank_us, || {
            TopK::new(self.config.limit).select(acc.into_groups())
        });
        stats.groups_emitted = groups.len();
        Ok(QueryOutput { groups, stats })
    }

    /// Materialize the planned pair, aggregate the other side and stream.
    fn evaluate(&self, plan: &JoinPlan, tables: &Tables, stats: &mut QueryStats) -> GroupAccumulator {
        let mode = self.config.mode;
        let t1 = tables.t1.rows();

        match plan.direction() {
            Direction::StreamT1 => {
                let pairs: Vec<Row> = self.materialize_pair(plan, tables, stats);
                let aggregate = timed(&mut stats.timings.aggregate_us, || {
                    SuffixAggregate::build(pairs, mode)
                });
                stats.aggregate_keys = aggregate.distinct_keys();
                timed(&mut stats.timings.accumulate_us, || {
                    accumulate_t1(t1, &aggregate, mode)
                })
            }
            Direction::StreamPairs => {
                let pairs: Vec<CombinedRow> = self.materialize_pair(plan, tables, stats);
                let third = tables.get(plan.third()).rows();
                let aggregate = timed(&mut stats.timings.aggregate_us, || {
                    SuffixAggregate::from_rows(third, mode)
                });
                stats.aggregate_keys = aggregate.distinct_keys();
                timed(&mut stats.timings.accumulate_us, || {
                    accumulate_pairs(t1, &pairs, &aggregate, mode)
                })
            }
        }
    }

    fn materialize_pair<E: PairRow>(
        &self,
        plan: &JoinPlan,
        tables: &Tables,
        stats: &mut QueryStats,
    ) -> Vec<E> {
        let (outer, inner) = plan.pairing.tables();
        let pairs: Vec<E> = timed(&mut stats.timings.materialize_us, || {
            materialize(
                plan.pairing,
                tables.get(outer).rows(),
                tables.get(inner).rows(),
                self.config.mode,
            )
        });
        stats.materialized_rows = pairs.len();
        debug!("materialized {} rows of {}", pairs.len(), plan.pairing);
        pairs
    }
}

/// Load three table files, evaluate the query under `config`, and write the ranked result.
///
/// Nothing is written to `output` unless the whole query succeeds.
///
/// # Errors
/// Returns an error on I/O failure, malformed input, or an internal planning failure.
pub fn select_with(
    config: &QueryConfig,
    t1: impl AsRef<Path>,
    t2: impl AsRef<Path>,
    t3: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<QueryStats> {
    let mut load_us = 0;
    let tables = timed(&mut load_us, || -> Result<Tables> {
        Ok(Tables::new(read_table(t1)?, read_table(t2)?, read_table(t3)?))
    })?;

    let QueryOutput { groups, mut stats } = ThresholdJoinQuery::new(*config).run(&tables)?;
    stats.timings.load_us = load_us;

    timed(&mut stats.timings.write_us, || write_ranked(output, &groups))?;
    stats.log_summary();
    Ok(stats)
}

/// Load three table files, evaluate the query with default settings, and write the result.
///
/// # Errors
/// See [`select_with`].
pub fn select(
    t1: impl AsRef<Path>,
    t2: impl AsRef<Path>,
    t3: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<()> {
    select_with(&QueryConfig::default(), t1, t2, t3, output).map(|_| ())
}
