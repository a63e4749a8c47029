//! Workload generators for policy benchmarks.
//!
//! Deterministic block streams seeded through `SmallRng`, plus a helper that
//! drives any [`ReplacementPolicy`] over a stream and reports its hit rate.

use lirsim::trace::OpKind;
use lirsim::traits::ReplacementPolicy;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random blocks in `[0, universe)`.
    Uniform,
    /// Hot/cold split with a configurable hot fraction and hot access probability.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`.
    Scan,
    /// Repeated loop over `[0, len)`; defeats LRU once `len` exceeds the cache.
    Loop { len: u64 },
    /// Zipfian distribution - models real-world skewed access patterns.
    /// `theta` controls skew: 0.0 = uniform, 0.99 = highly skewed (YCSB default).
    Zipfian { theta: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
    /// Probability that an access is a write.
    pub write_prob: f64,
}

impl WorkloadSpec {
    pub fn generator(self) -> WorkloadGenerator {
        WorkloadGenerator::new(self)
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    universe: u64,
    workload: Workload,
    write_prob: f64,
    rng: SmallRng,
    position: u64,
    zipfian: Option<ZipfianState>,
}

impl WorkloadGenerator {
    pub fn new(spec: WorkloadSpec) -> Self {
        let universe = spec.universe.max(1);
        let zipfian = match spec.workload {
            Workload::Zipfian { theta } => Some(ZipfianState::new(universe, theta)),
            _ => None,
        };
        Self {
            universe,
            workload: spec.workload,
            write_prob: spec.write_prob.clamp(0.0, 1.0),
            rng: SmallRng::seed_from_u64(spec.seed),
            position: 0,
            zipfian,
        }
    }

    pub fn next_block(&mut self) -> u64 {
        match self.workload {
            Workload::Uniform => self.rng.random_range(0..self.universe),
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot_fraction = hot_fraction.clamp(0.0, 1.0);
                let hot_prob = hot_prob.clamp(0.0, 1.0);
                let hot_size = ((self.universe as f64) * hot_fraction).round() as u64;
                let hot_size = hot_size.max(1).min(self.universe);
                if self.rng.random::<f64>() < hot_prob || hot_size == self.universe {
                    self.rng.random_range(0..hot_size)
                } else {
                    self.rng.random_range(hot_size..self.universe)
                }
            },
            Workload::Scan => self.advance(self.universe),
            Workload::Loop { len } => self.advance(len.max(1)),
            Workload::Zipfian { .. } => match &self.zipfian {
                Some(zipf) => zipf.sample(self.rng.random::<f64>()),
                None => 0,
            },
        }
    }

    pub fn next_op(&mut self) -> OpKind {
        if self.rng.random::<f64>() < self.write_prob {
            OpKind::Write
        } else {
            OpKind::Read
        }
    }

    fn advance(&mut self, period: u64) -> u64 {
        let block = self.position % period;
        self.position = self.position.wrapping_add(1);
        block
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HitRate {
    pub hits: u64,
    pub misses: u64,
}

impl HitRate {
    pub fn hit_rate(self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Drives `policy` with `operations` accesses from `generator`.
pub fn run_hit_rate<P>(
    policy: &mut P,
    generator: &mut WorkloadGenerator,
    operations: usize,
) -> HitRate
where
    P: ReplacementPolicy<u64> + ?Sized,
{
    let mut rate = HitRate::default();
    for _ in 0..operations {
        let block = generator.next_block();
        let op = generator.next_op();
        match policy.access(block, op) {
            Ok(outcome) if outcome.is_hit() => rate.hits += 1,
            _ => rate.misses += 1,
        }
    }
    rate
}

/// Zipfian distribution state for inverse CDF sampling.
///
/// Uses the algorithm from YCSB (Yahoo Cloud Serving Benchmark).
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        let alpha = 1.0 / (1.0 - theta);
        let eta = (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n);

        Self {
            n,
            theta,
            zeta_n,
            alpha,
            eta,
        }
    }

    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}
