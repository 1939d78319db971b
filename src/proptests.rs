use super::*;

use proptest::prelude::*;
use std::collections::BTreeSet;

const DOMAIN: u8 = 96;

#[derive(Clone, Debug)]
enum SetOp {
    Insert(u8, u8),
    Remove(u8, u8),
}

#[derive(Clone, Debug)]
enum IndexOp {
    Insert(u8, u8),
    /// Remove the n-th live entry, modulo the number of entries
    Remove(usize),
    Query(u8, u8),
}

fn range_strategy() -> impl Strategy<Value = (u8, u8)> {
    (0..DOMAIN, 0..12u8).prop_map(|(low, len)| (low, low.saturating_add(len).min(DOMAIN)))
}

fn set_ops_strategy() -> impl Strategy<Value = Vec<SetOp>> {
    let op = prop_oneof![
        3 => range_strategy().prop_map(|(l, h)| SetOp::Insert(l, h)),
        1 => range_strategy().prop_map(|(l, h)| SetOp::Remove(l, h)),
    ];
    prop::collection::vec(op, 0..200)
}

fn index_ops_strategy() -> impl Strategy<Value = Vec<IndexOp>> {
    let op = prop_oneof![
        3 => range_strategy().prop_map(|(l, h)| IndexOp::Insert(l, h)),
        1 => any::<usize>().prop_map(IndexOp::Remove),
        2 => range_strategy().prop_map(|(l, h)| IndexOp::Query(l, h)),
    ];
    prop::collection::vec(op, 0..200)
}

/// Maximal runs of consecutive values.
fn runs(values: &BTreeSet<u8>) -> Vec<Interval<u8>> {
    let mut runs: Vec<Interval<u8>> = Vec::new();
    for &v in values {
        match runs.last_mut() {
            Some(last) if last.high.successor() == v => last.high = v,
            _ => runs.push(Interval::new(v, v)),
        }
    }
    runs
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_set_matches_btreeset(ops in set_ops_strategy()) {
        let mut set: IntervalSet<u8> = IntervalSet::new();
        let mut model: BTreeSet<u8> = BTreeSet::new();

        for op in ops {
            match op {
                SetOp::Insert(low, high) => {
                    let changed = (low..=high).fold(false, |acc, v| model.insert(v) | acc);
                    prop_assert_eq!(set.insert(low, high), Ok(changed));
                }
                SetOp::Remove(low, high) => {
                    let changed = (low..=high).fold(false, |acc, v| model.remove(&v) | acc);
                    prop_assert_eq!(set.remove(low, high), Ok(changed));
                }
            }
            set.check();
        }

        let got: Vec<Interval<u8>> = set.iter().copied().collect();
        prop_assert_eq!(got, runs(&model));
        for v in 0..=DOMAIN {
            prop_assert_eq!(set.contains(v), model.contains(&v));
        }
    }

    #[test]
    fn prop_index_matches_linear_scan(ops in index_ops_strategy()) {
        let mut index: IntervalIndex<u8, usize> = IntervalIndex::new();
        let mut live: Vec<(NodeIndex, Interval<u8>, usize)> = Vec::new();

        for (step, op) in ops.into_iter().enumerate() {
            match op {
                IndexOp::Insert(low, high) => {
                    let handle = index.insert(low, high, step).unwrap();
                    live.push((handle, Interval::new(low, high), step));
                }
                IndexOp::Remove(n) => {
                    if !live.is_empty() {
                        let (handle, interval, value) = live.swap_remove(n % live.len());
                        prop_assert_eq!(index.remove(handle), Some((interval, value)));
                    }
                }
                IndexOp::Query(low, high) => {
                    let q = Interval::new(low, high);
                    let mut expected: Vec<NodeIndex> = live
                        .iter()
                        .filter(|(_, i, _)| i.overlaps(&q))
                        .map(|&(h, _, _)| h)
                        .collect();
                    let mut got = index.find_all_overlaps(low, high);
                    expected.sort_unstable();
                    got.sort_unstable();
                    prop_assert_eq!(&got, &expected);
                    prop_assert_eq!(index.find_one_overlap(low, high).is_some(), !expected.is_empty());

                    let mut filtered: Vec<NodeIndex> =
                        index.filter_iter(low, high).map(|(h, _, _)| h).collect();
                    filtered.sort_unstable();
                    prop_assert_eq!(filtered, expected);
                }
            }
            index.check();
            prop_assert_eq!(index.len(), live.len());
        }

        for (handle, interval, value) in &live {
            prop_assert_eq!(index.get(*handle), Some((interval, value)));
        }
    }
}
