#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::policy::lfu::LfuCache;
use lfukit::policy::placement::Variant;

// Perfect and FastPerfect differ only in how they find a bucket, so they
// must agree on every reference of every trace.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let capacity = u32::from(data[0] % 16) + 1;
    let (Ok(mut scan), Ok(mut indexed)) = (
        LfuCache::open(capacity, Variant::Perfect),
        LfuCache::open(capacity, Variant::FastPerfect),
    ) else {
        return;
    };

    for chunk in data[1..].chunks_exact(2) {
        let key = u64::from(chunk[0] % 48);
        let size = u32::from(chunk[1]) % capacity + 1;

        let a = scan.access(key, size).ok();
        let b = indexed.access(key, size).ok();
        assert_eq!(a, b, "variants diverged on key {key}");
        assert_eq!(scan.peek_victim(), indexed.peek_victim());
    }

    assert_eq!(scan.frequencies(), indexed.frequencies());
    indexed.check_invariants().unwrap();
    assert_eq!(scan.close(), indexed.close());
});
