//! Cache sizing for one experiment.
//!
//! A [`CacheConfig`] fixes the total capacity (in blocks) and how it is split
//! between the LIR partition and the resident-HIR queue:
//!
//! ```text
//!   lir_capacity = total_size * (100 - hir_ratio_percent) / 100
//!   hir_capacity = total_size * hir_ratio_percent / 100
//! ```
//!
//! Integer division may leave `lir_capacity + hir_capacity < total_size`,
//! never more. A configuration whose LIR partition rounds down to zero is
//! rejected because the policy could never promote anything.

use crate::error::ConfigError;

/// Percentage of capacity given to resident HIR blocks when none is specified.
pub const DEFAULT_HIR_RATIO_PERCENT: u32 = 1;

/// Validated capacity split for a replacement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    total_size: usize,
    lir_capacity: usize,
    hir_capacity: usize,
}

impl CacheConfig {
    /// Builds a configuration with the default 1% HIR ratio.
    ///
    /// # Example
    ///
    /// ```
    /// use lirsim::config::CacheConfig;
    ///
    /// let config = CacheConfig::new(500).unwrap();
    /// assert_eq!(config.lir_capacity(), 495);
    /// assert_eq!(config.hir_capacity(), 5);
    /// ```
    pub fn new(total_size: usize) -> Result<Self, ConfigError> {
        Self::try_new(total_size, DEFAULT_HIR_RATIO_PERCENT)
    }

    /// Builds a configuration from a total size and HIR percentage.
    pub fn try_new(total_size: usize, hir_ratio_percent: u32) -> Result<Self, ConfigError> {
        if total_size == 0 {
            return Err(ConfigError::new("cache size must be > 0"));
        }
        if hir_ratio_percent > 100 {
            return Err(ConfigError::new(format!(
                "hir ratio must be within 0..=100 percent, got {hir_ratio_percent}"
            )));
        }

        let ratio = hir_ratio_percent as u128;
        let total = total_size as u128;
        let lir_capacity = (total * (100 - ratio) / 100) as usize;
        let hir_capacity = (total * ratio / 100) as usize;

        if lir_capacity == 0 {
            return Err(ConfigError::new(format!(
                "cache size {total_size} with hir ratio {hir_ratio_percent}% leaves no room for LIR blocks"
            )));
        }

        Ok(Self {
            total_size,
            lir_capacity,
            hir_capacity,
        })
    }

    /// Builds a configuration from explicit partition sizes.
    ///
    /// # Example
    ///
    /// ```
    /// use lirsim::config::CacheConfig;
    ///
    /// let config = CacheConfig::try_with_capacities(2, 1).unwrap();
    /// assert_eq!(config.total_size(), 3);
    /// assert!(CacheConfig::try_with_capacities(0, 4).is_err());
    /// ```
    pub fn try_with_capacities(
        lir_capacity: usize,
        hir_capacity: usize,
    ) -> Result<Self, ConfigError> {
        if lir_capacity == 0 {
            return Err(ConfigError::new("lir capacity must be > 0"));
        }
        let total_size = lir_capacity
            .checked_add(hir_capacity)
            .ok_or_else(|| ConfigError::new("cache size overflows usize"))?;
        Ok(Self {
            total_size,
            lir_capacity,
            hir_capacity,
        })
    }

    /// Total cache size in blocks, as requested.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Maximum number of LIR blocks.
    pub fn lir_capacity(&self) -> usize {
        self.lir_capacity
    }

    /// Maximum number of resident HIR blocks.
    pub fn hir_capacity(&self) -> usize {
        self.hir_capacity
    }
}
