//! DHAT heap profiler for the lirsim policies.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use lirsim::config::CacheConfig;
use lirsim::policy::lirs::LirsCache;
use lirsim::policy::lru::LruCache;
use lirsim::trace::OpKind;
use lirsim::traits::ReplacementPolicy;

const CACHE_SIZE: usize = 4096;
const OPERATIONS: usize = 100_000;
const UNIVERSE: u64 = 16_384;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// 90% of accesses go to 10% of blocks; one in eight is a write.
fn hotset_workload<P: ReplacementPolicy<u64>>(policy: &mut P, seed: u64) {
    let mut rng = XorShift64::new(seed);
    let hot_size = UNIVERSE / 10;
    for _ in 0..OPERATIONS {
        let block = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + rng.next_u64() % (UNIVERSE - hot_size)
        };
        let op = if rng.next_u64() % 8 == 0 {
            OpKind::Write
        } else {
            OpKind::Read
        };
        let _ = policy.access(block, op);
    }
}

/// Sequential scan over a range four times the cache size. Grows the LIRS
/// recency stack with non-resident history.
fn scan_workload<P: ReplacementPolicy<u64>>(policy: &mut P) {
    for i in 0..OPERATIONS as u64 {
        let _ = policy.access(UNIVERSE + i % (4 * CACHE_SIZE as u64), OpKind::Read);
    }
}

fn report<P: ReplacementPolicy<u64>>(policy: &P) {
    let stats = policy.stats();
    println!(
        "  hits={} misses={} resident={} stack={}",
        stats.hits,
        stats.misses,
        policy.len(),
        stats.stack_len
    );
}

fn profile_lirs(config: CacheConfig) {
    println!("=== Profiling LIRS ===");
    let mut cache = LirsCache::new(config);
    hotset_workload(&mut cache, 42);
    scan_workload(&mut cache);
    hotset_workload(&mut cache, 7);
    report(&cache);
}

fn profile_lru(config: CacheConfig) {
    println!("=== Profiling LRU ===");
    let mut cache = LruCache::new(config);
    hotset_workload(&mut cache, 42);
    scan_workload(&mut cache);
    hotset_workload(&mut cache, 7);
    report(&cache);
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("lirsim DHAT Heap Profiling");
    println!("==========================\n");

    let Ok(config) = CacheConfig::new(CACHE_SIZE) else {
        eprintln!("invalid profiling cache size {CACHE_SIZE}");
        return;
    };
    profile_lirs(config);
    profile_lru(config);

    println!("\n==========================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
