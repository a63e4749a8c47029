//! # Replacement Policy Trait
//!
//! The simulator replays traces against anything implementing
//! [`ReplacementPolicy`]. Policies track block identifiers only, never data,
//! so the interface is a single `access` call plus read-only views.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │          ReplacementPolicy<K>                │
//!                 │                                              │
//!                 │  name(&) → &'static str                      │
//!                 │  access(&mut, K, OpKind)                     │
//!                 │        → Result<AccessOutcome, InvariantError>│
//!                 │  contains(&, &K) → bool   (resident?)        │
//!                 │  len(&) → usize           (resident count)   │
//!                 │  capacity(&) → usize                         │
//!                 │  stats(&) → PolicyStats                      │
//!                 └──────────────────────┬───────────────────────┘
//!                                        │
//!                   ┌────────────────────┴───────────────────┐
//!                   ▼                                        ▼
//!         ┌───────────────────┐                    ┌───────────────────┐
//!         │   LirsCache<K>    │                    │    LruCache<K>    │
//!         │  LIR set + Q + S  │                    │  one ordered set  │
//!         └───────────────────┘                    └───────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! Implementations are single-writer: `access` takes `&mut self` and relies on
//! strict call order to define recency. Independent experiments use
//! independent instances; nothing is shared between them.

use crate::error::InvariantError;
use crate::stats::PolicyStats;
use crate::trace::OpKind;

/// Result of one access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    Miss,
}

impl AccessOutcome {
    /// Returns `true` for [`AccessOutcome::Hit`].
    pub fn is_hit(self) -> bool {
        matches!(self, AccessOutcome::Hit)
    }
}

/// A cache replacement policy driven by a stream of block accesses.
///
/// # Example
///
/// ```
/// use lirsim::config::CacheConfig;
/// use lirsim::policy::lru::LruCache;
/// use lirsim::trace::OpKind;
/// use lirsim::traits::{AccessOutcome, ReplacementPolicy};
///
/// fn replay<P: ReplacementPolicy<u64>>(policy: &mut P, blocks: &[u64]) -> u64 {
///     let mut hits = 0;
///     for &b in blocks {
///         if policy.access(b, OpKind::Read).unwrap() == AccessOutcome::Hit {
///             hits += 1;
///         }
///     }
///     hits
/// }
///
/// let mut lru = LruCache::new(CacheConfig::new(100).unwrap());
/// assert_eq!(replay(&mut lru, &[1, 2, 1, 2]), 2);
/// ```
pub trait ReplacementPolicy<K> {
    /// Short upper-case policy name used in summary lines (e.g. `LIRS`).
    fn name(&self) -> &'static str;

    /// Applies one access, updating counters and replacement state.
    ///
    /// Errors only on an internal invariant violation, never on valid input.
    fn access(&mut self, key: K, op: OpKind) -> Result<AccessOutcome, InvariantError>;

    /// Returns `true` if `key` currently occupies cache space.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident blocks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured total capacity in blocks.
    fn capacity(&self) -> usize;

    /// Snapshot of counters and partition sizes.
    fn stats(&self) -> PolicyStats;
}
