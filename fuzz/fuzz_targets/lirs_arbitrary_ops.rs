#![no_main]

use libfuzzer_sys::fuzz_target;
use lirsim::config::CacheConfig;
use lirsim::policy::lirs::LirsCache;
use lirsim::policy::lru::LruCache;
use lirsim::trace::OpKind;
use lirsim::traits::ReplacementPolicy;

// Fuzz arbitrary access sequences against LIRS and the LRU baseline
//
// The first two bytes pick the LIR and HIR capacities; every following pair
// is (op, block). Invariants are checked after each access.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let lir = (data[0] as usize) % 16 + 1;
    let hir = (data[1] as usize) % 8;
    let Ok(config) = CacheConfig::try_with_capacities(lir, hir) else {
        return;
    };

    let mut lirs: LirsCache<u8> = LirsCache::new(config);
    let mut lru: LruCache<u8> = LruCache::new(config);
    let mut accesses = 0u64;

    for pair in data[2..].chunks_exact(2) {
        let op = if pair[0] & 1 == 1 {
            OpKind::Write
        } else {
            OpKind::Read
        };
        // Narrow block range so hits, promotions and demotions all happen.
        let block = pair[1] % 48;

        let outcome = lirs.access(block, op);
        assert!(outcome.is_ok(), "lirs access failed: {outcome:?}");
        assert!(lru.access(block, op).is_ok());
        accesses += 1;

        lirs.debug_validate_invariants();
        lru.debug_validate_invariants();

        // Accessed block is on the stack afterwards, and resident unless
        // there is no HIR capacity to hold it.
        assert!(lirs.in_stack(&block));
        if hir > 0 {
            assert!(lirs.contains(&block));
        }
        assert!(!(lirs.is_lir(&block) && lirs.is_resident_hir(&block)));

        assert!(lirs.lir_len() <= lir);
        assert!(lirs.resident_hir_len() <= hir);
        assert!(lirs.len() <= config.total_size());
        assert!(lru.len() <= config.total_size());

        if let Some(bottom) = lirs.stack_bottom() {
            assert!(lirs.is_lir(bottom));
        }
    }

    assert_eq!(lirs.hits() + lirs.misses(), accesses);
    assert_eq!(lru.stats().accesses(), accesses);
});
