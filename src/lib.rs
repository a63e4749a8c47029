//! lirsim: LIRS cache replacement simulation over block-access traces.
//!
//! The LIRS engine lives in [`policy::lirs`]; [`sim`] replays traces through
//! it (or the [`policy::lru`] baseline) and produces per-size reports.

pub mod config;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod sim;
pub mod stats;
pub mod trace;
pub mod traits;

pub use crate::config::CacheConfig;
pub use crate::ds::{IntrusiveList, OrderedSet, SlotArena, SlotId};
pub use crate::policy::lirs::LirsCache;
pub use crate::policy::lru::LruCache;
