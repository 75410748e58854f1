use anyhow::Result;
use tribeam::*;

mod support;
use support::brute_force;

fn run(tables: &Tables) -> Result<Vec<Group>> {
    Ok(ThresholdJoinQuery::new(QueryConfig::sequential()).run(tables)?.groups)
}

fn summary(groups: &[Group]) -> Vec<(f64, f64)> {
    groups.iter().map(|g| (g.key, g.sum)).collect()
}

#[test]
fn single_row_tables_match() -> Result<()> {
    let tables = Tables::new(
        Table::from_pairs([(1.0, 2.0)]),
        Table::from_pairs([(1.0, 3.0)]),
        Table::from_pairs([(1.0, 4.0)]),
    );
    let groups = run(&tables)?;
    assert_eq!(summary(&groups), vec![(1.0, 24.0)]);
    assert_eq!(groups[0].first_seen, 0);
    Ok(())
}

#[test]
fn predicate_false_everywhere_yields_no_groups() -> Result<()> {
    let tables = Tables::new(
        Table::from_pairs([(5.0, 1.0), (5.0, 2.0)]),
        Table::from_pairs([(0.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0)]),
    );
    assert!(run(&tables)?.is_empty());
    Ok(())
}

#[test]
fn empty_table_short_circuits() -> Result<()> {
    for empty in TableId::ALL {
        let mut tables = Tables::new(
            Table::from_pairs([(0.0, 1.0)]),
            Table::from_pairs([(1.0, 1.0)]),
            Table::from_pairs([(1.0, 1.0)]),
        );
        match empty {
            TableId::T1 => tables.t1 = Table::default(),
            TableId::T2 => tables.t2 = Table::default(),
            TableId::T3 => tables.t3 = Table::default(),
        }
        let out = ThresholdJoinQuery::default().run(&tables)?;
        assert!(out.groups.is_empty(), "empty {empty}");
        assert_eq!(out.stats.pairing, None);
    }
    Ok(())
}

#[test]
fn equal_sums_rank_by_first_occurrence() -> Result<()> {
    let tables = Tables::new(
        Table::from_pairs([(3.0, 5.0), (1.0, 10.0), (2.0, 20.0)]),
        Table::from_pairs([(2.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0), (2.0, 1.0)]),
    );
    // a=3: only b+c=4 qualifies -> 5; a=1: both 2 and 4 -> 20; a=2: only 4 -> 20
    let groups = run(&tables)?;
    assert_eq!(summary(&groups), vec![(1.0, 20.0), (2.0, 20.0), (3.0, 5.0)]);

    let tied = Tables::new(
        Table::from_pairs([(2.0, 1.0), (1.0, 1.0), (2.0, 0.0)]),
        Table::from_pairs([(5.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0)]),
    );
    let groups = run(&tied)?;
    assert_eq!(summary(&groups), vec![(2.0, 1.0), (1.0, 1.0)]);
    assert_eq!(groups[0].first_seen, 0);
    assert_eq!(groups[1].first_seen, 1);
    Ok(())
}

#[test]
fn tie_break_uses_t1_order_when_pair_holds_t1() -> Result<()> {
    // later rows of the same key must not move the group's position
    let tables = Tables::new(
        Table::from_pairs([(4.0, 1.0), (0.0, 1.0), (4.0, 1.0), (0.0, 1.0)]),
        Table::from_pairs([(5.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0)]),
    );
    for pairing in Pairing::ALL {
        let cfg = QueryConfig::sequential().with_forced_pairing(pairing);
        let groups = ThresholdJoinQuery::new(cfg).run(&tables)?.groups;
        assert_eq!(summary(&groups), vec![(4.0, 2.0), (0.0, 2.0)], "{pairing}");
        assert_eq!(
            groups.iter().map(|g| g.first_seen).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }
    Ok(())
}

#[test]
fn result_is_limited_to_ten_groups() -> Result<()> {
    let t1 = Table::from_pairs((0..25).map(|i| (f64::from(i), f64::from(i % 7))));
    let tables = Tables::new(
        t1,
        Table::from_pairs([(100.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0)]),
    );
    let groups = run(&tables)?;
    assert_eq!(groups.len(), 10);
    assert_eq!(groups, brute_force(&tables, 10));
    for w in groups.windows(2) {
        assert!(w[0].sum >= w[1].sum);
        if w[0].sum == w[1].sum {
            assert!(w[0].first_seen < w[1].first_seen);
        }
    }
    Ok(())
}

#[test]
fn custom_limit_is_honored() -> Result<()> {
    let tables = support::random_tables(7, 30, 5, 5);
    let cfg = QueryConfig::sequential().with_limit(3);
    let groups = ThresholdJoinQuery::new(cfg).run(&tables)?.groups;
    assert_eq!(groups, brute_force(&tables, 3));
    Ok(())
}

#[test]
fn zero_weight_matches_still_count_as_groups() -> Result<()> {
    let tables = Tables::new(
        Table::from_pairs([(1.0, 0.0), (9.0, 3.0)]),
        Table::from_pairs([(1.0, 1.0)]),
        Table::from_pairs([(1.0, 1.0)]),
    );
    let groups = run(&tables)?;
    assert_eq!(summary(&groups), vec![(1.0, 0.0)]);
    Ok(())
}

#[test]
fn nan_and_infinite_keys_follow_comparison_rules() -> Result<()> {
    let tables = Tables::new(
        Table::from_pairs([(f64::NAN, 1.0), (f64::NEG_INFINITY, 2.0), (f64::INFINITY, 4.0)]),
        Table::from_pairs([(0.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0), (f64::NAN, 1.0)]),
    );
    for pairing in Pairing::ALL {
        let cfg = QueryConfig::sequential().with_forced_pairing(pairing);
        let groups = ThresholdJoinQuery::new(cfg).run(&tables)?.groups;
        assert_eq!(groups.len(), 1, "{pairing}");
        assert_eq!(groups[0].key, f64::NEG_INFINITY);
        assert_eq!(groups[0].sum, 2.0);
    }
    Ok(())
}

#[test]
fn signed_zero_keys_are_separate_groups() -> Result<()> {
    let tables = Tables::new(
        Table::from_pairs([(0.0, 1.0), (-0.0, 2.0)]),
        Table::from_pairs([(1.0, 1.0)]),
        Table::from_pairs([(0.0, 1.0)]),
    );
    let groups = run(&tables)?;
    assert_eq!(groups.len(), 2);
    assert!(groups[0].key.is_sign_negative());
    assert_eq!(groups[0].sum, 2.0);
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> Result<()> {
    let tables = support::random_tables(42, 60, 40, 30);
    let query = ThresholdJoinQuery::default();
    let first = query.run(&tables)?.groups;
    for _ in 0..5 {
        assert_eq!(query.run(&tables)?.groups, first);
    }
    Ok(())
}

#[test]
fn over_budget_is_an_error() {
    let tables = support::random_tables(1, 10, 10, 10);
    let cfg = QueryConfig::sequential().with_memory_budget(10);
    let err = ThresholdJoinQuery::new(cfg).run(&tables).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::NoPairingFits { budget_bytes: 10, .. })
    ));
}
