//! Least Recently Used (LRU) baseline policy.
//!
//! Classic LRU over block identifiers, used to compare against LIRS on the
//! same trace. Built on the same [`OrderedSet`] primitive as the LIRS queues
//! but shares no state or logic with the LIRS engine.
//!
//! ```text
//!   recency: OrderedSet<K>
//!   front ─► [LRU] ◄──► [...] ◄──► [MRU] ◄── back
//!            evict                 hit/insert
//! ```
//!
//! | Operation | Time | Notes                              |
//! |-----------|------|------------------------------------|
//! | hit       | O(1) | move to back                       |
//! | miss      | O(1) | evict front when full, push back   |

use std::hash::Hash;

use crate::config::CacheConfig;
use crate::ds::OrderedSet;
use crate::error::InvariantError;
use crate::stats::PolicyStats;
use crate::trace::OpKind;
use crate::traits::{AccessOutcome, ReplacementPolicy};

/// LRU replacement over the full configured cache size.
///
/// The LIR/HIR split of the configuration is ignored; every block competes
/// for `total_size` slots.
#[derive(Debug)]
pub struct LruCache<K> {
    config: CacheConfig,
    recency: OrderedSet<K>,
    hits: u64,
    misses: u64,
    writes: u64,
}

impl<K> LruCache<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty cache holding up to `config.total_size()` blocks.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            recency: OrderedSet::with_capacity(config.total_size()),
            hits: 0,
            misses: 0,
            writes: 0,
        }
    }

    /// Next block to be evicted.
    pub fn peek_lru(&self) -> Option<&K> {
        self.recency.front()
    }

    /// Checks that the cache holds no more blocks than its capacity.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.recency.len() > self.config.total_size() {
            return Err(InvariantError::new(format!(
                "LRU holds {} blocks, capacity {}",
                self.recency.len(),
                self.config.total_size()
            )));
        }
        Ok(())
    }

    /// Panics on a list or capacity violation.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.recency.debug_validate_invariants();
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K> ReplacementPolicy<K> for LruCache<K>
where
    K: Clone + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn access(&mut self, key: K, op: OpKind) -> Result<AccessOutcome, InvariantError> {
        if op.is_write() {
            self.writes += 1;
        }
        if self.recency.touch(&key) {
            self.hits += 1;
            return Ok(AccessOutcome::Hit);
        }

        self.misses += 1;
        if self.recency.len() >= self.config.total_size() {
            self.recency
                .pop_front()
                .ok_or_else(|| InvariantError::new("full LRU list has no front"))?;
        }
        self.recency.push_back(key);
        Ok(AccessOutcome::Miss)
    }

    fn contains(&self, key: &K) -> bool {
        self.recency.contains(key)
    }

    fn len(&self) -> usize {
        self.recency.len()
    }

    fn capacity(&self) -> usize {
        self.config.total_size()
    }

    fn stats(&self) -> PolicyStats {
        PolicyStats {
            hits: self.hits,
            misses: self.misses,
            writes: self.writes,
            cache_size: self.config.total_size(),
            lir_capacity: self.config.total_size(),
            hir_capacity: 0,
            lir_len: self.recency.len(),
            resident_hir_len: 0,
            stack_len: self.recency.len(),
        }
    }
}
