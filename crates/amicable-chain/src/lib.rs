//! Amicable chain discovery.
//!
//! - `chain`: the cycle type returned to callers
//! - `explorer`: walks the divisor-sum functional graph and keeps the longest cycle

pub mod chain;
pub mod explorer;

pub use chain::AmicableChain;
pub use explorer::{
    find_longest_amicable_chain, longest_amicable_chain, solution, ChainExplorer, ChainReport,
};
pub use amicable_core::{TableStrategy, DEFAULT_LIMIT};
