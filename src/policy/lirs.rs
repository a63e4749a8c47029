//! Low Inter-reference Recency Set (LIRS) replacement policy.
//!
//! LIRS ranks blocks by inter-reference recency (how many distinct blocks were
//! touched between a block's last two references) instead of plain recency.
//! Blocks with a short reuse distance form the protected LIR set; the rest are
//! HIR blocks, of which only a small number stay resident in a FIFO queue.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                            LirsCache<K> Layout                              │
//! │                                                                             │
//! │   status: FxHashMap<K, Status>        (resident blocks only)                │
//! │   ┌──────────┬──────────────┐                                               │
//! │   │  block   │ Lir          │   absent from `status` + present in S         │
//! │   │  block   │ HirResident  │   ⇒ HIR non-resident (history only)         │
//! │   └──────────┴──────────────┘                                               │
//! │                                                                             │
//! │   Recency stack S (OrderedSet<K>)                                           │
//! │   ┌───────────────────────────────────────────────────────────────────┐     │
//! │   │ bottom (least recent)                               top (recent)  │     │
//! │   │  [L] ◄──► [h] ◄──► [L] ◄──► [n] ◄──► [L] ◄──► [h]                  │     │
//! │   │   ▲                                                               │     │
//! │   │   └── always an LIR block after pruning                           │     │
//! │   └───────────────────────────────────────────────────────────────────┘     │
//! │                                                                             │
//! │   Resident-HIR queue Q (OrderedSet<K>), bounded by hir_capacity             │
//! │   ┌───────────────────────────────────────────────────────────────────┐     │
//! │   │ front (oldest, evicted first)              back (newest)          │     │
//! │   └───────────────────────────────────────────────────────────────────┘     │
//! │                                                                             │
//! │   L = LIR   h = HIR resident   n = HIR non-resident                         │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Access Flow
//!
//! ```text
//!   access(block):
//!     warm-up (|LIR| < lir_capacity):
//!         hit iff already LIR; block becomes LIR; move to top of S
//!     LIR hit:
//!         move to top of S
//!         if block was bottom of S → prune stale bottom
//!     HIR-resident hit:
//!         in S     → promote
//!         not in S → move to back of Q, move to top of S
//!     miss:
//!         Q full   → evict front of Q (becomes non-resident)
//!         in S     → promote
//!         not in S → admit to back of Q, move to top of S
//! ```
//!
//! ## Promotion and Pruning
//!
//! ```text
//!   promote(block):
//!     check bottom of S is LIR (no state changes on failure)
//!     move block to top of S, mark LIR
//!     pop bottom LIR block → HIR resident at back of Q
//!     prune stale bottom
//!
//!   prune stale bottom:
//!     while bottom of S is not LIR: pop it
//! ```
//!
//! The promoted block is on top of S before pruning runs, so the entry left
//! at the bottom is always LIR.
//!
//! Every stack entry is pushed once per reference and popped at most once, so
//! pruning is amortized O(1) per access.
//!
//! ## Capacity Rules
//!
//! - `|LIR| ≤ lir_capacity` and `|Q| ≤ hir_capacity` after every access.
//! - The LIR set and Q are disjoint.
//! - Q is FIFO at capacity: the oldest admitted block is evicted first. A
//!   resident HIR hit that is not in S is moved to the back of Q.
//! - With `hir_capacity == 0` a block that is not promoted stays non-resident,
//!   and a demoted LIR block leaves the cache instead of entering Q.
//!
//! ## Example Usage
//!
//! ```
//! use lirsim::config::CacheConfig;
//! use lirsim::policy::lirs::LirsCache;
//! use lirsim::trace::OpKind;
//! use lirsim::traits::ReplacementPolicy;
//!
//! let mut cache = LirsCache::new(CacheConfig::try_with_capacities(2, 1).unwrap());
//! for block in [1u64, 2, 3, 1, 2, 4, 1, 2, 3] {
//!     cache.access(block, OpKind::Read).unwrap();
//! }
//!
//! let stats = cache.stats();
//! assert_eq!((stats.hits, stats.misses), (4, 5));
//! assert!(cache.is_lir(&1) && cache.is_lir(&2));
//! assert!(cache.is_resident_hir(&3));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe. One instance serves one ordered access stream.
//!
//! ## References
//!
//! - Jiang & Zhang, "LIRS: An Efficient Low Inter-reference Recency Set
//!   Replacement Policy to Improve Buffer Cache Performance", SIGMETRICS 2002

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::CacheConfig;
use crate::ds::OrderedSet;
use crate::error::InvariantError;
use crate::stats::PolicyStats;
use crate::trace::OpKind;
use crate::traits::{AccessOutcome, ReplacementPolicy};

/// Residency class of a cached block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Status {
    /// Member of the LIR set.
    Lir,
    /// Resident HIR block, present in Q.
    HirResident,
}

/// LIRS replacement engine over block identifiers.
#[derive(Debug)]
pub struct LirsCache<K> {
    config: CacheConfig,
    status: FxHashMap<K, Status>,
    /// Recency stack S; front is the bottom.
    stack: OrderedSet<K>,
    /// Resident-HIR queue Q; front is the next victim.
    resident_hirs: OrderedSet<K>,
    lir_len: usize,
    hits: u64,
    misses: u64,
    writes: u64,
}

impl<K> LirsCache<K>
where
    K: Clone + Eq + Hash + Debug,
{
    /// Creates an empty cache partitioned by `config`.
    pub fn new(config: CacheConfig) -> Self {
        let resident = config.total_size();
        Self {
            config,
            status: FxHashMap::with_capacity_and_hasher(resident, Default::default()),
            stack: OrderedSet::with_capacity(resident),
            resident_hirs: OrderedSet::with_capacity(config.hir_capacity()),
            lir_len: 0,
            hits: 0,
            misses: 0,
            writes: 0,
        }
    }

    /// Returns `true` if `key` is in the LIR set.
    pub fn is_lir(&self, key: &K) -> bool {
        matches!(self.status.get(key), Some(Status::Lir))
    }

    /// Returns `true` if `key` is a resident HIR block (in Q).
    pub fn is_resident_hir(&self, key: &K) -> bool {
        matches!(self.status.get(key), Some(Status::HirResident))
    }

    /// Returns `true` if `key` has an entry in the recency stack.
    pub fn in_stack(&self, key: &K) -> bool {
        self.stack.contains(key)
    }

    /// Returns the number of LIR blocks.
    pub fn lir_len(&self) -> usize {
        self.lir_len
    }

    /// Returns the number of resident HIR blocks in Q.
    pub fn resident_hir_len(&self) -> usize {
        self.resident_hirs.len()
    }

    /// Returns the number of recency stack entries, resident or not.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Least recent entry of the recency stack.
    pub fn stack_bottom(&self) -> Option<&K> {
        self.stack.front()
    }

    /// Recency stack from bottom to top.
    pub fn stack_iter(&self) -> impl Iterator<Item = &K> {
        self.stack.iter()
    }

    /// Resident-HIR queue from oldest to newest.
    pub fn resident_hir_iter(&self) -> impl Iterator<Item = &K> {
        self.resident_hirs.iter()
    }

    /// Returns the number of accesses that found the block resident.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the number of accesses that did not.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Returns the number of write accesses.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn warming_up(&self) -> bool {
        self.lir_len < self.config.lir_capacity()
    }

    fn access_warming(&mut self, key: K) -> AccessOutcome {
        let outcome = match self.status.get(&key) {
            Some(Status::Lir) => AccessOutcome::Hit,
            Some(Status::HirResident) => {
                // Q only fills after warm-up; handled for completeness.
                self.resident_hirs.remove(&key);
                AccessOutcome::Hit
            },
            None => AccessOutcome::Miss,
        };
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::Miss => self.misses += 1,
        }
        if self.status.insert(key.clone(), Status::Lir) != Some(Status::Lir) {
            self.lir_len += 1;
        }
        self.stack.push_back(key);
        outcome
    }

    fn on_lir_hit(&mut self, key: K) {
        self.hits += 1;
        let was_bottom = self.stack.front() == Some(&key);
        self.stack.push_back(key);
        if was_bottom {
            self.prune_stale_bottom();
        }
    }

    fn on_resident_hir_hit(&mut self, key: K) -> Result<(), InvariantError> {
        if self.stack.contains(&key) {
            self.promote(key)?;
        } else {
            self.resident_hirs.touch(&key);
            self.stack.push_back(key);
        }
        self.hits += 1;
        Ok(())
    }

    fn on_miss(&mut self, key: K) -> Result<(), InvariantError> {
        let in_stack = self.stack.contains(&key);
        if in_stack {
            self.ensure_lir_bottom()?;
        }
        if self.resident_hirs.len() >= self.config.hir_capacity() {
            self.evict_resident_hir();
        }
        if in_stack {
            self.promote(key)?;
        } else {
            self.admit_resident_hir(key.clone());
            self.stack.push_back(key);
        }
        self.misses += 1;
        Ok(())
    }

    /// Fails without touching any state unless the stack bottom is LIR.
    fn ensure_lir_bottom(&self) -> Result<(), InvariantError> {
        match self.stack.front() {
            Some(bottom) if self.is_lir(bottom) => Ok(()),
            Some(bottom) => Err(InvariantError::new(format!(
                "recency stack bottom {bottom:?} is not an LIR block"
            ))),
            None => Err(InvariantError::new("promotion on empty recency stack")),
        }
    }

    /// Makes `key` an LIR block on top of S, then demotes the LIR block at
    /// the stack bottom.
    fn promote(&mut self, key: K) -> Result<(), InvariantError> {
        self.ensure_lir_bottom()?;
        trace!(block = ?key, "promote to LIR");
        self.resident_hirs.remove(&key);
        self.stack.push_back(key.clone());
        self.status.insert(key, Status::Lir);
        self.lir_len += 1;
        self.demote_bottom();
        Ok(())
    }

    /// Moves the LIR block at the stack bottom to Q and prunes the stale
    /// entries it exposes. The caller has checked that the bottom is LIR.
    fn demote_bottom(&mut self) {
        if let Some(bottom) = self.stack.pop_front() {
            trace!(block = ?bottom, "demote to HIR");
            self.lir_len -= 1;
            self.admit_resident_hir(bottom);
        }
        self.prune_stale_bottom();
    }

    /// Drops the oldest resident HIR block. It keeps its stack entry, if any.
    fn evict_resident_hir(&mut self) {
        if let Some(victim) = self.resident_hirs.pop_front() {
            trace!(block = ?victim, "evict resident HIR");
            self.status.remove(&victim);
        }
    }

    /// Places `key` at the back of Q, making room first. With no HIR capacity
    /// the block is left non-resident.
    fn admit_resident_hir(&mut self, key: K) {
        if self.config.hir_capacity() == 0 {
            self.status.remove(&key);
            return;
        }
        if self.resident_hirs.len() >= self.config.hir_capacity() {
            self.evict_resident_hir();
        }
        self.status.insert(key.clone(), Status::HirResident);
        self.resident_hirs.push_back(key);
    }

    /// Discards non-LIR entries from the stack bottom until an LIR block is
    /// at the bottom or the stack is empty.
    fn prune_stale_bottom(&mut self) {
        while let Some(bottom) = self.stack.front() {
            if self.is_lir(bottom) {
                break;
            }
            self.stack.pop_front();
        }
    }

    /// Verifies the structural invariants of the policy.
    ///
    /// Cheap enough for tests to call after every access; O(n) in the number
    /// of resident blocks.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let lir_cap = self.config.lir_capacity();
        let hir_cap = self.config.hir_capacity();

        if self.lir_len > lir_cap {
            return Err(InvariantError::new(format!(
                "LIR set size {} exceeds capacity {lir_cap}",
                self.lir_len
            )));
        }
        if self.resident_hirs.len() > hir_cap {
            return Err(InvariantError::new(format!(
                "resident HIR queue size {} exceeds capacity {hir_cap}",
                self.resident_hirs.len()
            )));
        }

        let counted_lir = self.status.values().filter(|s| **s == Status::Lir).count();
        if counted_lir != self.lir_len {
            return Err(InvariantError::new(format!(
                "LIR counter {} disagrees with status table {counted_lir}",
                self.lir_len
            )));
        }
        if self.status.len() != self.lir_len + self.resident_hirs.len() {
            return Err(InvariantError::new(
                "status table holds blocks outside LIR set and Q",
            ));
        }
        for key in self.resident_hirs.iter() {
            if !self.is_resident_hir(key) {
                return Err(InvariantError::new(format!(
                    "queued block {key:?} is not marked HIR resident"
                )));
            }
        }
        if self.resident() > self.config.total_size() {
            return Err(InvariantError::new("resident blocks exceed cache size"));
        }
        if let Some(bottom) = self.stack.front()
            && !self.is_lir(bottom)
        {
            return Err(InvariantError::new(format!(
                "recency stack bottom {bottom:?} is not an LIR block"
            )));
        }
        for (key, status) in &self.status {
            if *status == Status::Lir && !self.stack.contains(key) {
                return Err(InvariantError::new(format!(
                    "LIR block {key:?} has no recency stack entry"
                )));
            }
        }
        Ok(())
    }

    fn resident(&self) -> usize {
        self.lir_len + self.resident_hirs.len()
    }

    /// Panics on any violation reported by [`Self::check_invariants`].
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.stack.debug_validate_invariants();
        self.resident_hirs.debug_validate_invariants();
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K> ReplacementPolicy<K> for LirsCache<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn name(&self) -> &'static str {
        "LIRS"
    }

    fn access(&mut self, key: K, op: OpKind) -> Result<AccessOutcome, InvariantError> {
        let outcome = if self.warming_up() {
            self.access_warming(key)
        } else {
            match self.status.get(&key).copied() {
                Some(Status::Lir) => {
                    self.on_lir_hit(key);
                    AccessOutcome::Hit
                },
                Some(Status::HirResident) => {
                    self.on_resident_hir_hit(key)?;
                    AccessOutcome::Hit
                },
                None => {
                    self.on_miss(key)?;
                    AccessOutcome::Miss
                },
            }
        };

        if op.is_write() {
            self.writes += 1;
        }
        Ok(outcome)
    }

    fn contains(&self, key: &K) -> bool {
        self.status.contains_key(key)
    }

    fn len(&self) -> usize {
        self.resident()
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
            lir_capacity: self.config.lir_capacity(),
            hir_capacity: self.config.hir_capacity(),
            lir_len: self.lir_len,
            resident_hir_len: self.resident_hirs.len(),
            stack_len: self.stack.len(),
        }
    }
}
