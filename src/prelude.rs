pub use crate::config::CacheConfig;
pub use crate::error::{ConfigError, InvariantError, SimError, TraceError};
pub use crate::policy::lirs::LirsCache;
pub use crate::policy::lru::LruCache;
pub use crate::sim::{Experiment, PolicyKind, Report, Simulator};
pub use crate::stats::PolicyStats;
pub use crate::trace::{Access, BlockId, OpKind, TraceReader};
pub use crate::traits::{AccessOutcome, ReplacementPolicy};
