//! Replacement policies.
//!
//! - [`lirs`]: Low Inter-reference Recency Set, the policy under study.
//! - [`lru`]: classic LRU, kept as a comparison baseline.

pub mod lirs;
pub mod lru;
