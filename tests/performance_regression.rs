//! Performance regression tests
//!
//! These tests verify complexity guarantees and catch major performance regressions.
//! They are NOT micro-benchmarks - use `cargo bench` for detailed performance analysis.
//!
//! ## Purpose
//!
//! - Verify O(1) complexity for hits, fresh admissions and evictions in every variant
//! - Ensure reasonable performance bounds (loose thresholds to avoid flakiness)
//! - Catch catastrophic regressions that would impact trace replay
//!
//! ## What NOT to test here
//!
//! - Exact nanosecond timings (use benchmarks)
//! - Hit-ratio comparisons between variants (use benchmarks)

use std::time::{Duration, Instant};

use lfukit::policy::lfu::LfuCache;
use lfukit::policy::placement::Variant;

/// Helper to measure operation duration
fn measure_time<F, R>(operation: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = operation();
    (result, start.elapsed())
}

const SIZES: [u32; 4] = [1000, 2000, 4000, 8000];

#[derive(Debug, Clone, Copy)]
enum Operation {
    Hit,
    FreshMiss,
    Eviction,
}

/// Average nanoseconds per access of `operation` on a cache of `size` unit items.
fn average_time(variant: Variant, operation: Operation, size: u32) -> f64 {
    let mut cache = LfuCache::open(size, variant).unwrap();
    let size = u64::from(size);

    let (iterations, duration) = match operation {
        Operation::Hit => {
            for key in 0..size {
                cache.access(key, 1).unwrap();
            }
            let iterations = 10_000u64;
            let (_, duration) = measure_time(|| {
                for i in 0..iterations {
                    cache.access(i % size, 1).unwrap();
                }
            });
            (iterations, duration)
        },
        Operation::FreshMiss => {
            let (_, duration) = measure_time(|| {
                for key in 0..size {
                    cache.access(key, 1).unwrap();
                }
            });
            (size, duration)
        },
        Operation::Eviction => {
            for key in 0..size {
                cache.access(key, 1).unwrap();
            }
            let iterations = 1000u64;
            let (_, duration) = measure_time(|| {
                for key in size..size + iterations {
                    cache.access(key, 1).unwrap();
                }
            });
            (iterations, duration)
        },
    };

    duration.as_nanos() as f64 / iterations as f64
}

fn verify_complexity(variant: Variant, operation: Operation) {
    let times: Vec<f64> = SIZES
        .iter()
        .map(|&size| {
            let avg_time = average_time(variant, operation, size);
            println!(
                "[{}] Size: {}, Avg {:?} time: {:.2} ns",
                variant, size, operation, avg_time
            );
            avg_time
        })
        .collect();

    // Doubling the size should NOT double the time. The 15x allowance
    // absorbs cache effects, hash table resizing and debug-build noise.
    for i in 1..times.len() {
        let size_ratio = f64::from(SIZES[i]) / f64::from(SIZES[i - 1]);
        let time_ratio = times[i] / times[i - 1];

        println!(
            "[{}] Size {}→{} ({:.2}x): time {:.1}ns→{:.1}ns ({:.2}x)",
            variant,
            SIZES[i - 1],
            SIZES[i],
            size_ratio,
            times[i - 1],
            times[i],
            time_ratio
        );

        assert!(
            time_ratio < 15.0,
            "[{}] {:?} appears to be O(n), not O(1):\n\
             Size increased by {:.2}x but time increased by {:.2}x",
            variant,
            operation,
            size_ratio,
            time_ratio
        );
    }
}

// =============================================================================
// Complexity Tests - Verify O(1) behavior
// =============================================================================

mod complexity_basic {
    use super::*;

    #[test]
    fn test_hit_is_o1() {
        verify_complexity(Variant::Basic, Operation::Hit);
    }

    #[test]
    fn test_fresh_miss_is_o1() {
        verify_complexity(Variant::Basic, Operation::FreshMiss);
    }

    #[test]
    fn test_eviction_is_o1() {
        verify_complexity(Variant::Basic, Operation::Eviction);
    }
}

mod complexity_perfect {
    use super::*;

    #[test]
    fn test_hit_is_o1() {
        verify_complexity(Variant::Perfect, Operation::Hit);
    }

    #[test]
    fn test_fresh_miss_is_o1() {
        verify_complexity(Variant::Perfect, Operation::FreshMiss);
    }

    #[test]
    fn test_eviction_is_o1() {
        verify_complexity(Variant::Perfect, Operation::Eviction);
    }
}

mod complexity_fast_perfect {
    use super::*;

    #[test]
    fn test_hit_is_o1() {
        verify_complexity(Variant::FastPerfect, Operation::Hit);
    }

    #[test]
    fn test_fresh_miss_is_o1() {
        verify_complexity(Variant::FastPerfect, Operation::FreshMiss);
    }

    #[test]
    fn test_eviction_is_o1() {
        verify_complexity(Variant::FastPerfect, Operation::Eviction);
    }
}

// =============================================================================
// Critical Performance Regression Guards
// =============================================================================

mod regression_guards {
    use super::*;

    /// Ensure basic operations complete in reasonable time
    /// This catches catastrophic regressions (e.g., accidentally O(n) operations)
    #[test]
    fn test_operations_are_reasonably_fast() {
        for variant in Variant::ALL {
            let mut cache = LfuCache::open(10_000, variant).unwrap();
            for key in 0..10_000u64 {
                cache.access(key, 1).unwrap();
            }

            let iterations = 50_000u64;
            let (_, hit_duration) = measure_time(|| {
                for i in 0..iterations {
                    cache.access(i % 10_000, 1).unwrap();
                }
            });
            let (_, evict_duration) = measure_time(|| {
                for key in 10_000..10_000 + iterations {
                    cache.access(key, 1).unwrap();
                }
            });

            println!(
                "[{}] 50K hits: {:.2}ms, 50K miss+evict: {:.2}ms",
                variant,
                hit_duration.as_secs_f64() * 1000.0,
                evict_duration.as_secs_f64() * 1000.0
            );

            // Very loose bounds - debug mode timings
            assert!(
                hit_duration < Duration::from_secs(10),
                "[{variant}] hits too slow: took {hit_duration:?} for 50K ops"
            );
            assert!(
                evict_duration < Duration::from_secs(10),
                "[{variant}] miss+evict too slow: took {evict_duration:?} for 50K ops"
            );
        }
    }

    /// Resident state stays bounded by capacity no matter how long the trace.
    #[test]
    fn test_resident_set_stays_bounded() {
        let capacity = 1000u32;
        let mut cache = LfuCache::open(capacity, Variant::FastPerfect).unwrap();
        for key in 0..11_000u64 {
            cache.access(key, 1).unwrap();
        }

        assert_eq!(cache.len(), capacity as usize);
        assert_eq!(cache.current_size(), u64::from(capacity));
        assert_eq!(
            cache.ghost_len(),
            10_000,
            "every evicted one-time key leaves exactly one ghost"
        );
    }
}
