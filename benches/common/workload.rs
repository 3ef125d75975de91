//! Reference-trace generators for hit-rate benchmarks.
//!
//! Produces deterministic `(key, size)` streams from a seeded `SmallRng`.

use lfukit::traits::{Replay, TraceCache};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// Hot/cold split with a configurable hot fraction and hot access probability.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`.
    Scan,
    /// Zipfian distribution - models real-world skewed access patterns.
    /// `theta` controls skew: 0.0 = uniform, 0.99 = highly skewed (YCSB default).
    Zipfian { theta: f64 },
}

/// Item sizes attached to each key. A key always keeps the same size.
#[derive(Debug, Clone, Copy)]
pub enum Sizes {
    Unit,
    /// Sizes in `[1, max]`, derived from the key.
    Varied { max: u32 },
}

impl Sizes {
    fn size_of(self, key: u64) -> u32 {
        match self {
            Sizes::Unit => 1,
            Sizes::Varied { max } => {
                let mixed = key.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32;
                (mixed % u64::from(max.max(1))) as u32 + 1
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub sizes: Sizes,
    pub seed: u64,
}

impl WorkloadSpec {
    pub fn generator(self) -> WorkloadGenerator {
        WorkloadGenerator::new(self)
    }

    /// Materializes `operations` references so generation stays out of the
    /// timed loop.
    pub fn trace(self, operations: usize) -> Vec<(u64, u32)> {
        let mut generator = self.generator();
        (0..operations).map(|_| generator.next_reference()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    universe: u64,
    workload: Workload,
    sizes: Sizes,
    rng: SmallRng,
    scan_pos: u64,
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
            sizes: spec.sizes,
            rng: SmallRng::seed_from_u64(spec.seed),
            scan_pos: 0,
            zipfian,
        }
    }

    pub fn next_reference(&mut self) -> (u64, u32) {
        let key = self.next_key();
        (key, self.sizes.size_of(key))
    }

    pub fn next_key(&mut self) -> u64 {
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
            Workload::Scan => {
                let key = self.scan_pos;
                self.scan_pos = (self.scan_pos + 1) % self.universe;
                key
            },
            Workload::Zipfian { .. } => match &self.zipfian {
                Some(zipf) => zipf.sample(self.rng.random::<f64>()),
                None => 0,
            },
        }
    }
}

/// Replays `trace` against a freshly opened cache.
pub fn run_hit_rate<C: TraceCache>(cache: &mut C, trace: &[(u64, u32)]) -> Replay {
    cache
        .replay(trace.iter().copied())
        .unwrap_or_else(|err| panic!("benchmark trace rejected: {err}"))
}

/// Zipfian distribution state for inverse CDF sampling.
///
/// Uses the algorithm from YCSB (Yahoo Cloud Serving Benchmark).
/// Pre-computes zeta values for efficient sampling.
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
        let theta = theta.clamp(0.0, 0.9999); // Avoid division issues at theta=1
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

    /// Compute zeta(n, theta) = sum(1/i^theta for i in 1..=n)
    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    /// Sample from Zipfian distribution given uniform random u in [0, 1).
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
