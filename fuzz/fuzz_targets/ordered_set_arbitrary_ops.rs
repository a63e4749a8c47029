#![no_main]

use libfuzzer_sys::fuzz_target;
use lirsim::ds::OrderedSet;

// Fuzz arbitrary operation sequences on OrderedSet
//
// Mirrors every operation on a Vec model and compares order after each step.
fuzz_target!(|data: &[u8]| {
    let mut set: OrderedSet<u8> = OrderedSet::new();
    let mut model: Vec<u8> = Vec::new();

    for pair in data.chunks_exact(2) {
        let key = pair[1] % 32;
        match pair[0] % 5 {
            0 => {
                let inserted = set.push_back(key);
                let existed = model.contains(&key);
                assert_eq!(inserted, !existed);
                model.retain(|k| *k != key);
                model.push(key);
            },
            1 => {
                let touched = set.touch(&key);
                assert_eq!(touched, model.contains(&key));
                if touched {
                    model.retain(|k| *k != key);
                    model.push(key);
                }
            },
            2 => {
                let popped = set.pop_front();
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0))
                };
                assert_eq!(popped, expected);
            },
            3 => {
                let removed = set.remove(&key);
                assert_eq!(removed, model.contains(&key));
                model.retain(|k| *k != key);
            },
            4 => {
                // Read-only
                assert_eq!(set.contains(&key), model.contains(&key));
            },
            _ => unreachable!(),
        }

        set.debug_validate_invariants();
        assert_eq!(set.len(), model.len());
        assert_eq!(set.front(), model.first());
        assert_eq!(set.back(), model.last());
    }

    let order: Vec<u8> = set.iter().copied().collect();
    assert_eq!(order, model);
});
