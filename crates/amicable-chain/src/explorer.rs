use crate::chain::AmicableChain;
use amicable_core::{check_limit, DivisorSumTable, TableStrategy, DEFAULT_LIMIT};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one exploration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub limit: u64,
    /// Longest cycle found; ties keep the first one discovered.
    pub longest: Option<AmicableChain>,
    /// Distinct cycles (perfect numbers included) lying entirely in `1..=limit`.
    pub cycles_found: usize,
    /// Start values that opened a fresh trajectory.
    pub trajectories: usize,
}

impl ChainReport {
    fn empty(limit: u64) -> Self {
        Self {
            limit,
            longest: None,
            cycles_found: 0,
            trajectories: 0,
        }
    }

    pub fn smallest_member(&self) -> Option<u64> {
        self.longest.as_ref().map(AmicableChain::smallest)
    }

    pub fn chain_length(&self) -> usize {
        self.longest.as_ref().map_or(0, AmicableChain::len)
    }
}

/// Walks the divisor-sum functional graph over `1..=limit`.
///
/// Every value joins exactly one trajectory: a walk stops as soon as it leaves
/// the range, revisits its own trajectory (a cycle), or steps onto a value an
/// earlier trajectory already resolved. Any cycle reachable from that value was
/// recorded by the earlier walk, so nothing is lost by stopping.
#[derive(Debug, Clone)]
pub struct ChainExplorer {
    limit: u64,
    strategy: TableStrategy,
}

impl ChainExplorer {
    pub fn new(limit: u64) -> Self {
        Self::with_strategy(limit, TableStrategy::default())
    }

    pub fn with_strategy(limit: u64, strategy: TableStrategy) -> Self {
        Self { limit, strategy }
    }

    /// Limits of 0 and limits above `MAX_LIMIT` yield an empty report.
    pub fn explore(&self) -> ChainReport {
        if self.limit < 1 {
            return ChainReport::empty(self.limit);
        }
        if let Err(e) = check_limit(self.limit) {
            warn!("{}", e);
            return ChainReport::empty(self.limit);
        }
        let table = DivisorSumTable::build(self.limit, self.strategy);
        Self::explore_table(&table)
    }

    /// Runs the search over a prebuilt table; the table's limit bounds the range.
    pub fn explore_table(table: &DivisorSumTable) -> ChainReport {
        let started = Instant::now();
        let limit = table.limit();
        let mut report = ChainReport::empty(limit);

        let mut visited = vec![false; limit as usize + 1];
        let mut chain: Vec<u64> = Vec::new();
        let mut positions: FxHashMap<u64, usize> = FxHashMap::default();

        for start in 1..=limit {
            if visited[start as usize] {
                continue;
            }
            report.trajectories += 1;
            chain.clear();
            positions.clear();

            let mut current = start;
            let reentry = loop {
                if let Some(&index) = positions.get(&current) {
                    break Some(index);
                }
                let Some(next) = table.successor(current) else {
                    break None;
                };
                if visited[current as usize] {
                    break None;
                }
                positions.insert(current, chain.len());
                chain.push(current);
                visited[current as usize] = true;
                current = next;
            };

            let Some(index) = reentry else {
                continue;
            };
            let cycle = &chain[index..];
            report.cycles_found += 1;
            debug_assert!(cycle
                .iter()
                .zip(cycle.iter().cycle().skip(1))
                .all(|(&from, &to)| table.successor(from) == Some(to)));

            if cycle.len() > report.chain_length() {
                debug!(
                    start,
                    length = cycle.len(),
                    entry = cycle[0],
                    "new longest amicable chain"
                );
                report.longest = Some(AmicableChain::from_cycle(cycle.to_vec()));
            }
        }

        info!(
            limit,
            cycles = report.cycles_found,
            trajectories = report.trajectories,
            longest = report.chain_length(),
            smallest = ?report.smallest_member(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "amicable chain search finished"
        );

        report
    }
}

/// Longest amicable chain with every member in `1..=limit`.
pub fn longest_amicable_chain(limit: u64) -> Option<AmicableChain> {
    ChainExplorer::new(limit).explore().longest
}

/// Smallest member of the longest amicable chain under `limit`, or `None` when
/// the range holds no cycle at all.
pub fn find_longest_amicable_chain(limit: u64) -> Option<u64> {
    longest_amicable_chain(limit).map(|chain| chain.smallest())
}

/// Answer for the default limit of one million.
pub fn solution() -> Option<u64> {
    find_longest_amicable_chain(DEFAULT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amicable_core::MAX_LIMIT;

    #[test]
    fn test_no_chain_below_first_perfect_number() {
        for limit in 0..6 {
            assert_eq!(find_longest_amicable_chain(limit), None, "limit = {}", limit);
        }
    }

    #[test]
    fn test_perfect_number_is_a_chain_of_length_one() {
        let report = ChainExplorer::new(6).explore();
        assert_eq!(report.smallest_member(), Some(6));
        assert_eq!(report.chain_length(), 1);
        assert_eq!(report.cycles_found, 1);
    }

    #[test]
    fn test_tie_keeps_first_found() {
        // 6 and 28 are both length-one cycles
        let report = ChainExplorer::new(200).explore();
        assert_eq!(report.cycles_found, 2);
        assert_eq!(report.longest.unwrap().members(), &[6]);
    }

    #[test]
    fn test_pair_needs_both_members_in_range() {
        assert_eq!(find_longest_amicable_chain(283), Some(6));
        assert_eq!(find_longest_amicable_chain(284), Some(220));
    }

    #[test]
    fn test_limit_one_thousand() {
        let report = ChainExplorer::new(1000).explore();
        assert_eq!(report.smallest_member(), Some(220));
        assert_eq!(report.longest.as_ref().unwrap().members(), &[220, 284]);
        // 6, 28, 496 and the 220/284 pair
        assert_eq!(report.cycles_found, 4);
    }

    #[test]
    fn test_five_cycle() {
        assert_eq!(find_longest_amicable_chain(15_471), Some(220));

        let chain = longest_amicable_chain(15_472).unwrap();
        assert_eq!(chain.members(), &[12496, 14288, 15472, 14536, 14264]);
    }

    #[test]
    fn test_oversized_limit_is_absent() {
        assert_eq!(find_longest_amicable_chain(u64::MAX), None);
        assert_eq!(find_longest_amicable_chain(MAX_LIMIT + 1), None);
    }

    #[test]
    fn test_limit_one_has_no_chain() {
        let report = ChainExplorer::new(1).explore();
        assert_eq!(report.trajectories, 1);
        assert_eq!(report.longest, None);
    }
}
