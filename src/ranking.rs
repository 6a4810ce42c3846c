//! Ordinal ranks from scores.
//!
//! Three methods are used and must not be mixed up:
//! - `min` (competition ranking): ties share the lowest rank and the next
//!   distinct score skips past them, e.g. `1, 1, 1, 4`.
//! - `dense`: ties share a rank and the next distinct score takes rank + 1,
//!   e.g. `1, 1, 1, 2`.
//! - sequential: strictly by arrival order within a group, never tied.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

fn descending(a: &f64, b: &f64) -> Ordering {
    b.total_cmp(a)
}

/// Competition ("min") rank, highest value first.
pub fn rank_min_descending(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(descending);
    values
        .iter()
        .map(|v| sorted.partition_point(|x| x.total_cmp(v) == Ordering::Greater) + 1)
        .collect()
}

/// Dense rank, highest value first.
pub fn rank_dense_descending(values: &[f64]) -> Vec<usize> {
    let mut distinct = values.to_vec();
    distinct.sort_by(descending);
    distinct.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    values
        .iter()
        .map(|v| distinct.partition_point(|x| x.total_cmp(v) == Ordering::Greater) + 1)
        .collect()
}

fn within_groups<G: Eq + Hash>(
    groups: &[G],
    values: &[f64],
    rank: fn(&[f64]) -> Vec<usize>,
) -> Vec<usize> {
    let mut members: HashMap<&G, Vec<usize>> = HashMap::new();
    for (i, g) in groups.iter().enumerate() {
        members.entry(g).or_default().push(i);
    }
    let mut ranks = vec![0; values.len()];
    for indices in members.values() {
        let group_values: Vec<f64> = indices.iter().map(|&i| values[i]).collect();
        for (&i, r) in indices.iter().zip(rank(&group_values)) {
            ranks[i] = r;
        }
    }
    ranks
}

/// Competition rank computed separately inside each group.
pub fn rank_min_descending_within<G: Eq + Hash>(groups: &[G], values: &[f64]) -> Vec<usize> {
    within_groups(groups, values, rank_min_descending)
}

/// Dense rank computed separately inside each group.
pub fn rank_dense_descending_within<G: Eq + Hash>(groups: &[G], values: &[f64]) -> Vec<usize> {
    within_groups(groups, values, rank_dense_descending)
}

/// 1-based arrival order inside each group, ordering by `order` ascending.
/// Equal order keys keep their input order.
pub fn sequential_rank_within<G: Eq + Hash, K: Ord>(groups: &[G], order: &[K]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..groups.len()).collect();
    indices.sort_by(|&a, &b| order[a].cmp(&order[b]));
    let mut counters: HashMap<&G, usize> = HashMap::new();
    let mut ranks = vec![0; groups.len()];
    for i in indices {
        let counter = counters.entry(&groups[i]).or_insert(0);
        *counter += 1;
        ranks[i] = *counter;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_rank_three_way_tie() {
        assert_eq!(
            rank_min_descending(&[10.0, 12.5, 12.5, 12.5, 3.0]),
            vec![4, 1, 1, 1, 5]
        );
    }

    #[test]
    fn test_dense_rank() {
        assert_eq!(
            rank_dense_descending(&[10.0, 12.5, 12.5, 3.0]),
            vec![2, 1, 1, 3]
        );
    }

    #[test]
    fn test_rank_is_idempotent() {
        let values = [4.0, -1.5, 4.0, 7.25];
        assert_eq!(rank_min_descending(&values), rank_min_descending(&values));
    }

    #[test]
    fn test_rank_within_groups() {
        let groups = ["QB", "RB", "QB", "RB", "QB"];
        let values = [10.0, 5.0, 20.0, 5.0, 20.0];
        assert_eq!(rank_min_descending_within(&groups, &values), vec![3, 1, 1, 1, 1]);
        assert_eq!(rank_dense_descending_within(&groups, &values), vec![2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_sequential_rank_by_pick() {
        let groups = [("2020", "RB"), ("2020", "QB"), ("2020", "RB"), ("2021", "RB")];
        let picks = [7, 1, 2, 3];
        assert_eq!(sequential_rank_within(&groups, &picks), vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_empty() {
        assert!(rank_min_descending(&[]).is_empty());
        assert!(sequential_rank_within::<u8, u8>(&[], &[]).is_empty());
    }
}
