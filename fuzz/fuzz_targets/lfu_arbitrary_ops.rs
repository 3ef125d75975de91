#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::error::AccessError;
use lfukit::policy::lfu::LfuCache;
use lfukit::policy::placement::Variant;

// Fuzz arbitrary access sequences on LfuCache
//
// The first two bytes pick the variant and capacity; every following
// 3-byte chunk is one operation. Invariants are audited after each step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let variant = Variant::ALL[usize::from(data[0]) % Variant::ALL.len()];
    let capacity = u32::from(data[1] % 32) + 1;
    let Ok(mut cache) = LfuCache::open(capacity, variant) else {
        return;
    };

    for chunk in data[2..].chunks_exact(3) {
        let op = chunk[0] % 8;
        let key = u64::from(chunk[1] % 64);
        let size = u32::from(chunk[2] % 40);

        match op {
            0..=5 => {
                let before = cache.stats();
                let was_resident = cache.contains(key);
                match cache.access(key, size) {
                    Ok(outcome) => {
                        assert_eq!(outcome.is_hit(), was_resident);
                        assert!(cache.contains(key));
                    },
                    Err(AccessError::Config(_)) => {
                        // Rejected requests mutate nothing
                        assert_eq!(cache.stats(), before);
                    },
                    Err(err) => panic!("unexpected access error: {err}"),
                }
            },
            6 => {
                // Peek victim (read-only)
                if let Some(victim) = cache.peek_victim() {
                    assert!(cache.contains(victim));
                    assert_eq!(cache.frequency(victim), cache.frequencies().first().copied());
                }
            },
            7 => {
                let before = cache.stats();
                cache.clear();
                assert!(cache.is_empty());
                assert_eq!(cache.ghost_len(), 0);
                assert_eq!(cache.stats().total_refs, before.total_refs);
            },
            _ => unreachable!(),
        }

        cache.check_invariants().unwrap();

        let stats = cache.stats();
        assert!(stats.current_size <= u64::from(capacity));
        assert_eq!(stats.hits + stats.misses, stats.total_refs);
        if !variant.remembers_evictions() {
            assert_eq!(stats.ghost_entries, 0);
        }
    }
});
