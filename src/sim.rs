//! Experiment driver: replays a trace through a policy and reports counters.
//!
//! ## Flow
//!
//! ```text
//!   Simulator::run_all(&[Experiment])
//!     │
//!     ├── thread::scope ── worker 1: open trace ─► replay ─► Report
//!     ├──                  worker 2: open trace ─► replay ─► Report
//!     └──                  worker n: ...
//!     │
//!     └── join all, results in experiment order
//! ```
//!
//! Each worker owns its policy and its own scan of the trace file; nothing is
//! shared except the cancellation flag. A failed worker (bad trace line,
//! invariant violation) returns its error without disturbing the others.
//!
//! Cancellation is cooperative: the flag is checked between accesses and a
//! cancelled run returns [`SimError::Cancelled`].

use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::CacheConfig;
use crate::error::{ConfigError, SimError};
use crate::policy::lirs::LirsCache;
use crate::policy::lru::LruCache;
use crate::stats::PolicyStats;
use crate::trace::{BlockId, TraceReader};
use crate::traits::ReplacementPolicy;

/// Replacement policy selectable for an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyKind {
    #[default]
    Lirs,
    Lru,
}

impl PolicyKind {
    /// Builds a fresh policy instance for `config`.
    pub fn build(self, config: CacheConfig) -> Box<dyn ReplacementPolicy<BlockId>> {
        match self {
            PolicyKind::Lirs => Box::new(LirsCache::new(config)),
            PolicyKind::Lru => Box::new(LruCache::new(config)),
        }
    }

    /// Validates a cache of `total_size` blocks for this policy.
    ///
    /// LIRS splits the cache by `hir_ratio_percent`; LRU uses the whole size
    /// as one list and ignores the ratio.
    pub fn configure(
        self,
        total_size: usize,
        hir_ratio_percent: u32,
    ) -> Result<CacheConfig, ConfigError> {
        match self {
            PolicyKind::Lirs => CacheConfig::try_new(total_size, hir_ratio_percent),
            PolicyKind::Lru => CacheConfig::try_new(total_size, 0),
        }
    }

    /// Name used in reports and summary lines.
    pub fn label(self) -> &'static str {
        match self {
            PolicyKind::Lirs => "LIRS",
            PolicyKind::Lru => "LRU",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lirs" => Ok(PolicyKind::Lirs),
            "lru" => Ok(PolicyKind::Lru),
            other => Err(format!("unknown policy {other:?} (expected lirs or lru)")),
        }
    }
}

/// One policy at one cache size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experiment {
    pub policy: PolicyKind,
    pub config: CacheConfig,
}

impl Experiment {
    /// Experiment for `policy` at `config`.
    pub fn new(policy: PolicyKind, config: CacheConfig) -> Self {
        Self { policy, config }
    }

    /// LIRS experiment at `config`.
    pub fn lirs(config: CacheConfig) -> Self {
        Self::new(PolicyKind::Lirs, config)
    }
}

/// Outcome of a completed experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub policy: &'static str,
    pub stats: PolicyStats,
    pub elapsed: Duration,
    /// Records whose op code was missing or unrecognized (read as `R`).
    pub unrecognized_ops: u64,
}

impl Report {
    /// Machine-parsable line: `!<POLICY>|<cacheSize>|<hits>|<accesses>|`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use lirsim::sim::Report;
    /// use lirsim::stats::PolicyStats;
    ///
    /// let report = Report {
    ///     policy: "LIRS",
    ///     stats: PolicyStats { hits: 4, misses: 5, cache_size: 3, ..Default::default() },
    ///     elapsed: Duration::ZERO,
    ///     unrecognized_ops: 0,
    /// };
    /// assert_eq!(report.summary_line(), "!LIRS|3|4|9|");
    /// ```
    pub fn summary_line(&self) -> String {
        format!(
            "!{}|{}|{}|{}|",
            self.policy,
            self.stats.cache_size,
            self.stats.hits,
            self.stats.accesses()
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "{}", "_".repeat(55))?;
        writeln!(f, "{}", self.policy)?;
        writeln!(f, "cache size : {}", s.cache_size)?;
        writeln!(f, "cache hit : {}", s.hits)?;
        writeln!(f, "cache miss : {}", s.misses)?;
        writeln!(f, "hit ratio : {:.4}", s.hit_ratio_percent())?;
        writeln!(f, "list size : {}", s.resident_hir_len)?;
        writeln!(f, "stack size : {}", s.stack_len)?;
        writeln!(f, "lir capacity : {}", s.lir_capacity)?;
        writeln!(f, "hir capacity : {}", s.hir_capacity)?;
        writeln!(f, "write count : {}", s.writes)?;
        write!(f, "duration : {:.6}", self.elapsed.as_secs_f64())
    }
}

/// Feeds every record of `reader` into `policy`, in order.
///
/// Returns the number of accesses applied. Stops at the first trace error or
/// invariant violation, or when `cancel` is set.
pub fn replay<P, R>(
    policy: &mut P,
    reader: &mut TraceReader<R>,
    cancel: &AtomicBool,
) -> Result<u64, SimError>
where
    P: ReplacementPolicy<BlockId> + ?Sized,
    R: BufRead,
{
    let mut accesses = 0u64;
    for record in reader {
        if cancel.load(Ordering::Relaxed) {
            return Err(SimError::Cancelled { accesses });
        }
        let access = record?;
        policy.access(access.block, access.op)?;
        accesses += 1;
    }
    Ok(accesses)
}

/// Runs experiments against one trace file.
#[derive(Debug)]
pub struct Simulator {
    trace: PathBuf,
    cancel: Arc<AtomicBool>,
}

impl Simulator {
    /// Simulator over the trace file at `trace`. The file is opened per run.
    pub fn new(trace: impl Into<PathBuf>) -> Self {
        Self {
            trace: trace.into(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag; setting it stops running experiments at the next access.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Asks running experiments to stop.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Runs one experiment with its own scan of the trace file.
    pub fn run(&self, experiment: &Experiment) -> Result<Report, SimError> {
        let reader = TraceReader::open(&self.trace)?;
        self.run_reader(experiment, reader)
    }

    /// Runs one experiment over an already-open trace.
    pub fn run_reader<R: BufRead>(
        &self,
        experiment: &Experiment,
        mut reader: TraceReader<R>,
    ) -> Result<Report, SimError> {
        let size = experiment.config.total_size();
        let policy_name = experiment.policy.label();
        info!(policy = policy_name, cache_size = size, "experiment started");

        let start = Instant::now();
        let mut policy = experiment.policy.build(experiment.config);
        let accesses = replay(policy.as_mut(), &mut reader, &self.cancel)?;
        let elapsed = start.elapsed();

        if let Some(line) = reader.first_unrecognized_line() {
            warn!(
                policy = policy_name,
                cache_size = size,
                count = reader.unrecognized_ops(),
                first_line = line,
                "unrecognized op codes treated as reads"
            );
        }

        let stats = policy.stats();
        info!(
            policy = policy_name,
            cache_size = size,
            accesses,
            lines = reader.lines_read(),
            hits = stats.hits,
            misses = stats.misses,
            elapsed_ms = elapsed.as_millis() as u64,
            "experiment finished"
        );

        Ok(Report {
            policy: policy.name(),
            stats,
            elapsed,
            unrecognized_ops: reader.unrecognized_ops(),
        })
    }

    /// Runs all experiments concurrently, one worker each, and returns their
    /// results in input order once every worker has finished.
    pub fn run_all(&self, experiments: &[Experiment]) -> Vec<Result<Report, SimError>> {
        thread::scope(|scope| {
            let workers: Vec<_> = experiments
                .iter()
                .map(|experiment| scope.spawn(move || self.run(experiment)))
                .collect();

            workers
                .into_iter()
                .zip(experiments)
                .map(|(worker, experiment)| {
                    let result = join_worker(worker);
                    if let Err(err) = &result {
                        error!(
                            policy = experiment.policy.label(),
                            cache_size = experiment.config.total_size(),
                            error = %err,
                            "experiment failed"
                        );
                    }
                    result
                })
                .collect()
        })
    }
}

/// Waits for a worker, turning a panic into that experiment's error.
fn join_worker<T>(worker: ScopedJoinHandle<'_, Result<T, SimError>>) -> Result<T, SimError> {
    worker.join().unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Err(SimError::WorkerPanicked { message })
    })
}
