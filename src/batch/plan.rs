//! Group planning.

use super::config::GroupingPolicy;

/// Number of groups a run of `n` requests is split into.
pub fn group_count(n: usize, limit: usize, policy: GroupingPolicy) -> usize {
    let limit = limit.max(1);
    if n == 0 {
        return 0;
    }
    match policy {
        GroupingPolicy::Chunked => n.div_ceil(limit),
        GroupingPolicy::Legacy => {
            if n <= limit {
                1
            } else {
                n / limit + n % limit
            }
        }
    }
}

/// Partition request indices `0..n` into dispatch groups.
///
/// Every index appears in exactly one group. Groups may be empty under
/// [`GroupingPolicy::Legacy`], where each group takes every request that is
/// still pending when its scan runs.
pub fn plan_groups(n: usize, limit: usize, policy: GroupingPolicy) -> Vec<Vec<usize>> {
    let limit = limit.max(1);
    let groups = group_count(n, limit, policy);
    match policy {
        GroupingPolicy::Chunked => (0..groups)
            .map(|g| (g * limit..((g + 1) * limit).min(n)).collect())
            .collect(),
        GroupingPolicy::Legacy => {
            let mut pending = vec![true; n];
            (0..groups)
                .map(|_| {
                    let group: Vec<usize> = (0..n).filter(|&i| pending[i]).collect();
                    for &i in &group {
                        pending[i] = false;
                    }
                    group
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(groups: &[Vec<usize>]) -> Vec<usize> {
        groups.iter().flatten().copied().collect()
    }

    #[test]
    fn test_chunked_uses_ceiling_division() {
        assert_eq!(group_count(0, 10, GroupingPolicy::Chunked), 0);
        assert_eq!(group_count(10, 10, GroupingPolicy::Chunked), 1);
        assert_eq!(group_count(11, 10, GroupingPolicy::Chunked), 2);
        assert_eq!(group_count(25, 10, GroupingPolicy::Chunked), 3);
    }

    #[test]
    fn test_chunked_groups_are_bounded_and_ordered() {
        let groups = plan_groups(25, 10, GroupingPolicy::Chunked);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], (0..10).collect::<Vec<_>>());
        assert_eq!(groups[1], (10..20).collect::<Vec<_>>());
        assert_eq!(groups[2], (20..25).collect::<Vec<_>>());
        assert!(groups.iter().all(|g| g.len() <= 10));
    }

    #[test]
    fn test_legacy_group_count() {
        assert_eq!(group_count(3, 10, GroupingPolicy::Legacy), 1);
        assert_eq!(group_count(10, 10, GroupingPolicy::Legacy), 1);
        // 25 / 10 + 25 % 10
        assert_eq!(group_count(25, 10, GroupingPolicy::Legacy), 7);
        assert_eq!(group_count(20, 10, GroupingPolicy::Legacy), 2);
    }

    #[test]
    fn test_legacy_first_scan_takes_everything() {
        let groups = plan_groups(25, 10, GroupingPolicy::Legacy);
        assert_eq!(groups.len(), 7);
        assert_eq!(groups[0].len(), 25);
        assert!(groups[1..].iter().all(|g| g.is_empty()));
    }

    #[test]
    fn test_every_index_planned_once() {
        for policy in [GroupingPolicy::Chunked, GroupingPolicy::Legacy] {
            for n in [0, 1, 9, 10, 11, 37] {
                let groups = plan_groups(n, 4, policy);
                assert_eq!(flatten(&groups), (0..n).collect::<Vec<_>>(), "{policy:?} n={n}");
            }
        }
    }

    #[test]
    fn test_zero_limit_is_treated_as_one() {
        let groups = plan_groups(3, 0, GroupingPolicy::Chunked);
        assert_eq!(groups, vec![vec![0], vec![1], vec![2]]);
    }
}
