//! Counter snapshots read once a trace has been replayed.

/// Point-in-time view of a policy's counters and partition sizes.
///
/// Counters (`hits`, `misses`, `writes`) only ever increase. The remaining
/// fields are gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PolicyStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,

    /// Configured total cache size in blocks.
    pub cache_size: usize,
    pub lir_capacity: usize,
    pub hir_capacity: usize,

    /// Current LIR set size.
    pub lir_len: usize,
    /// Current resident-HIR queue size (Q).
    pub resident_hir_len: usize,
    /// Current recency stack size (S), resident or not.
    pub stack_len: usize,
}

impl PolicyStats {
    /// Total accesses observed.
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hits over accesses, as a percentage. Zero before any access.
    pub fn hit_ratio_percent(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            100.0 * self.hits as f64 / total as f64
        }
    }

    /// Blocks currently occupying cache space.
    pub fn resident(&self) -> usize {
        self.lir_len + self.resident_hir_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_of_empty_stats_is_zero() {
        let stats = PolicyStats::default();
        assert_eq!(stats.accesses(), 0);
        assert_eq!(stats.hit_ratio_percent(), 0.0);
    }

    #[test]
    fn hit_ratio_is_percentage() {
        let stats = PolicyStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.accesses(), 4);
        assert!((stats.hit_ratio_percent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resident_sums_partitions() {
        let stats = PolicyStats {
            lir_len: 4,
            resident_hir_len: 2,
            stack_len: 9,
            ..Default::default()
        };
        assert_eq!(stats.resident(), 6);
    }
}
