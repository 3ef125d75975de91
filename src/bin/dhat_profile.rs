//! DHAT heap profiler for lfukit.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>
//!
//! The interesting number is ghost growth: Perfect and FastPerfect keep one
//! ghost per evicted key, so a scan over a large universe grows the heap
//! while Basic stays flat.

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use lfukit::policy::lfu::LfuCache;
use lfukit::policy::placement::Variant;

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

/// Run a hotset workload: 90% of accesses hit 10% of keys.
fn hotset_workload(cache: &mut LfuCache, operations: usize, universe: u64, seed: u64) {
    let mut rng = XorShift64::new(seed);
    let hot_size = (universe as f64 * 0.1) as u64;

    for _ in 0..operations {
        let key = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + (rng.next_u64() % (universe - hot_size))
        };
        let size = (key % 4 + 1) as u32;
        let _ = cache.access(key, size);
    }
}

/// Run a scan workload: sequential access pattern.
fn scan_workload(cache: &mut LfuCache, operations: usize, universe: u64) {
    for i in 0..operations {
        let _ = cache.access((i as u64) % universe, 1);
    }
}

/// Run eviction churn: one-time keys that all end up as ghosts.
fn eviction_churn(cache: &mut LfuCache, operations: usize) {
    for i in 0..operations {
        let _ = cache.access(1_000_000 + i as u64, 1);
    }
}

fn profile(variant: Variant) {
    println!("=== Profiling LFU ({variant}) ===");
    let capacity = 4096u32;
    let operations = 100_000;
    let universe = 16_384;

    let Ok(mut cache) = LfuCache::open(capacity, variant) else {
        println!("  could not open cache");
        return;
    };

    for key in 0..u64::from(capacity) {
        let _ = cache.access(key, 1);
    }

    hotset_workload(&mut cache, operations, universe, 42);
    scan_workload(&mut cache, operations / 2, universe);
    eviction_churn(&mut cache, operations / 4);

    println!("  Resident items: {}", cache.len());
    println!("  Ghost entries:  {}", cache.ghost_len());
    println!("  Approx bytes:   {}", cache.approx_bytes());
    println!("  {}", cache.close());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("lfukit DHAT Heap Profiling");
    println!("==========================\n");

    for variant in Variant::ALL {
        profile(variant);
    }

    println!("\n==========================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
