// ==============================================
// VARIANT EQUIVALENCE TESTS (integration)
// ==============================================
//
// The three variants share one skeleton and differ only in placement and
// ghost memory. On traces where no evicted key ever returns, ghost memory
// never comes into play, so all three must classify every reference the
// same way. Perfect and FastPerfect must agree on every trace.

use lfukit::prelude::*;
use proptest::prelude::*;

/// (key, size) references over a small key space so hits and evictions
/// both happen often.
fn trace_strategy() -> impl Strategy<Value = Vec<(u64, u32)>> {
    prop::collection::vec((0u64..24, 1u32..=4), 1..300)
}

fn outcomes(variant: Variant, capacity: u32, trace: &[(u64, u32)]) -> (Vec<Access>, CacheStats) {
    let mut cache = LfuCache::open(capacity, variant).unwrap();
    let mut seen = Vec::with_capacity(trace.len());
    for &(key, size) in trace {
        seen.push(cache.access(key, size).unwrap());
    }
    cache.check_invariants().unwrap();
    (seen, cache.close())
}

/// Drops every reference to a key after that key was evicted under Basic.
fn without_returning_evictions(capacity: u32, trace: &[(u64, u32)]) -> Vec<(u64, u32)> {
    let mut cache = LfuCache::open(capacity, Variant::Basic).unwrap();
    let mut resident_once = std::collections::HashSet::new();
    let mut kept = Vec::with_capacity(trace.len());
    for &(key, size) in trace {
        if resident_once.contains(&key) && !cache.contains(key) {
            continue;
        }
        cache.access(key, size).unwrap();
        resident_once.insert(key);
        kept.push((key, size));
    }
    kept
}

// ==============================================
// Property Tests
// ==============================================

proptest! {
    #[test]
    fn prop_all_variants_agree_without_returning_keys(
        capacity in 4u32..32,
        trace in trace_strategy(),
    ) {
        let trace = without_returning_evictions(capacity, &trace);
        let (basic, basic_stats) = outcomes(Variant::Basic, capacity, &trace);
        let (perfect, perfect_stats) = outcomes(Variant::Perfect, capacity, &trace);
        let (fast, fast_stats) = outcomes(Variant::FastPerfect, capacity, &trace);

        prop_assert_eq!(&basic, &perfect);
        prop_assert_eq!(&perfect, &fast);
        prop_assert_eq!(basic_stats.hits, fast_stats.hits);
        prop_assert_eq!(basic_stats.evictions, perfect_stats.evictions);
        prop_assert_eq!(perfect_stats.restored, 0);
    }

    #[test]
    fn prop_perfect_and_fast_perfect_agree(
        capacity in 4u32..32,
        trace in trace_strategy(),
    ) {
        let mut perfect = LfuCache::open(capacity, Variant::Perfect).unwrap();
        let mut fast = LfuCache::open(capacity, Variant::FastPerfect).unwrap();

        for &(key, size) in &trace {
            let a = perfect.access(key, size).unwrap();
            let b = fast.access(key, size).unwrap();
            prop_assert_eq!(a, b, "key {} diverged", key);
            prop_assert_eq!(perfect.peek_victim(), fast.peek_victim());
        }
        prop_assert_eq!(perfect.frequencies(), fast.frequencies());
        perfect.check_invariants().unwrap();
        fast.check_invariants().unwrap();

        let perfect_stats = perfect.close();
        let fast_stats = fast.close();
        prop_assert_eq!(perfect_stats, fast_stats);
    }

    #[test]
    fn prop_hot_key_is_never_evicted(
        variant in prop::sample::select(Variant::ALL.to_vec()),
        capacity in 2u32..8,
        cold in prop::collection::vec(100u64..10_000, 1..64),
    ) {
        // Hot key 0 is referenced before every cold key, so it always holds
        // the strictly highest frequency once the cache is full.
        let mut cache = LfuCache::open(capacity, variant).unwrap();
        for &key in &cold {
            cache.access(0, 1).unwrap();
            cache.access(key, 1).unwrap();
            prop_assert!(cache.contains(0), "{} evicted the hot key", variant);
        }
        let stats = cache.close();
        prop_assert!(stats.hits >= cold.len() as u64 - 1);
    }
}
