use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed cycle under the divisor-sum successor function.
///
/// Members are kept in traversal order, starting at the value where the
/// trajectory re-entered the cycle. A perfect number is a cycle of length 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmicableChain {
    members: Vec<u64>,
}

impl AmicableChain {
    /// Callers guarantee `members` is non-empty and closed.
    pub(crate) fn from_cycle(members: Vec<u64>) -> Self {
        debug_assert!(!members.is_empty());
        Self { members }
    }

    pub fn members(&self) -> &[u64] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn smallest(&self) -> u64 {
        self.members.iter().copied().min().unwrap_or_default()
    }

    pub fn largest(&self) -> u64 {
        self.members.iter().copied().max().unwrap_or_default()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.members.contains(&value)
    }

    /// Checks that `successor` maps each member to the next one and the last
    /// back to the first.
    pub fn is_closed_under<F>(&self, successor: F) -> bool
    where
        F: Fn(u64) -> u64,
    {
        if self.members.is_empty() {
            return false;
        }
        self.members
            .iter()
            .zip(self.members.iter().cycle().skip(1))
            .all(|(&from, &to)| successor(from) == to)
    }
}

impl fmt::Display for AmicableChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", member)?;
        }
        if let Some(first) = self.members.first() {
            write!(f, " -> {}", first)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amicable_core::sum_of_proper_divisors;

    #[test]
    fn test_pair_accessors() {
        let chain = AmicableChain::from_cycle(vec![284, 220]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.smallest(), 220);
        assert_eq!(chain.largest(), 284);
        assert!(chain.contains(220));
        assert!(!chain.contains(6));
        assert!(chain.is_closed_under(sum_of_proper_divisors));
    }

    #[test]
    fn test_perfect_number_is_closed() {
        let chain = AmicableChain::from_cycle(vec![28]);
        assert!(chain.is_closed_under(sum_of_proper_divisors));
        assert_eq!(chain.to_string(), "28 -> 28");
    }

    #[test]
    fn test_open_sequence_is_rejected() {
        // 12 -> 16 -> 15, never returns
        let chain = AmicableChain::from_cycle(vec![12, 16]);
        assert!(!chain.is_closed_under(sum_of_proper_divisors));
    }

    #[test]
    fn test_display() {
        let chain = AmicableChain::from_cycle(vec![220, 284]);
        assert_eq!(chain.to_string(), "220 -> 284 -> 220");
    }
}
