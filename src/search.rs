//! Offline search for multiply-shift parameters.
//!
//! Every `(multiplier, shift, modulus)` candidate in the configured ranges is scored
//! over the whole key set, and the winner is the one with the smallest largest bucket,
//! then the smallest average bucket. Ties keep the candidate seen first in the
//! canonical order: multiplier, then shift, then modulus.
//!
//! Candidates are independent, so with the `parallel` feature the multipliers are
//! spread over a rayon pool. Each multiplier yields its own improvement staircase and a
//! sequential fold over those staircases reproduces exactly the list of improvements a
//! single-threaded scan would have reported.

use crate::keyset::{KeySet, KeySetError};
use crate::metrics::{BucketMetrics, BucketTally};
use crate::params::{multiplier_for_index, HashParams};
use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use rayon::ThreadPoolBuilder;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Overrides the number of search threads.
pub const THREADS_ENV: &str = "PARAM_HASH_SEARCH_THREADS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid search config: {0}")]
    Config(String),
    #[error("invalid key set: {0}")]
    KeySet(#[from] KeySetError),
}

/// Search ranges.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search indices; index `i` tries multiplier `2 * i + 1`.
    pub multipliers: Range<u32>,
    pub shifts: Range<u32>,
    /// Bucket counts to try. Usually just one.
    pub moduli: Vec<u32>,
    /// Spread multipliers over threads (needs the `parallel` feature).
    pub parallel: bool,
    /// Largest bucket the caller is happy with; a worse result is logged as a warning.
    pub target_max_collision: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            multipliers: 1..100_000,
            shifts: 0..23,
            moduli: vec![128],
            parallel: true,
            target_max_collision: 1,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.multipliers.is_empty() {
            return Err(SearchError::Config("multiplier range is empty".into()));
        }
        if self.shifts.is_empty() {
            return Err(SearchError::Config("shift range is empty".into()));
        }
        if self.shifts.end > u64::BITS {
            return Err(SearchError::Config(format!(
                "shifts must stay below {}, range ends at {}",
                u64::BITS,
                self.shifts.end
            )));
        }
        if self.moduli.is_empty() {
            return Err(SearchError::Config("no modulus to try".into()));
        }
        if self.moduli.contains(&0) {
            return Err(SearchError::Config("modulus must be positive".into()));
        }
        Ok(())
    }

    /// Number of candidates the search evaluates.
    pub fn candidates(&self) -> u64 {
        self.multipliers.len() as u64 * self.shifts.len() as u64 * self.moduli.len() as u64
    }
}

/// One evaluated parameter choice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub params: HashParams,
    pub metrics: BucketMetrics,
}

impl Candidate {
    #[inline]
    pub fn beats(&self, other: &Candidate) -> bool {
        self.metrics.beats(&other.metrics)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "multiplier={}\tshift={}\tmax_coll={}\tavg_len={}\tmod={}\tutilized={}",
            self.params.multiplier,
            self.params.shift,
            self.metrics.max_collision,
            self.metrics.avg_occupancy(),
            self.params.modulus,
            self.metrics.occupied,
        )
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Candidate,
    /// Every strictly better candidate, in the order a sequential scan finds them.
    /// The last entry is `best`.
    pub improvements: Vec<Candidate>,
    pub evaluated: u64,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn params(&self) -> HashParams {
        self.best.params
    }

    pub fn is_perfect(&self) -> bool {
        self.best.metrics.is_perfect()
    }

    /// Bucket contents under the winning parameters, keys in registry order.
    pub fn assignment<'a>(&self, keys: &KeySet<'a>) -> Vec<Vec<&'a str>> {
        let params = self.best.params;
        let mut buckets = vec![Vec::new(); params.buckets()];
        for (key, encoded) in keys.iter() {
            buckets[params.bucket(encoded)].push(key);
        }
        buckets
    }

    /// One line per improvement, then a summary line.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for c in &self.improvements {
            out.push_str(&c.to_string());
            out.push('\n');
        }
        out.push_str(&format!(
            "evaluated={}\ttime={:.3}s\tbest: {}\n",
            self.evaluated,
            self.elapsed.as_secs_f64(),
            self.best
        ));
        out
    }

    pub fn print_summary(&self) {
        println!("Parameter search:");
        println!("  Candidates: {}", self.evaluated);
        println!("  Improvements: {}", self.improvements.len());
        println!("  Time: {:.3}s", self.elapsed.as_secs_f64());
        println!("  Best: {}", self.best);
        println!(
            "  Perfect: {}",
            if self.is_perfect() { "yes" } else { "no" }
        );
    }
}

pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_multipliers(mut self, indices: Range<u32>) -> Self {
        self.config.multipliers = indices;
        self
    }

    pub fn with_shifts(mut self, shifts: Range<u32>) -> Self {
        self.config.shifts = shifts;
        self
    }

    pub fn with_moduli(mut self, moduli: Vec<u32>) -> Self {
        self.config.moduli = moduli;
        self
    }

    pub fn with_modulus(self, modulus: u32) -> Self {
        self.with_moduli(vec![modulus])
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    pub fn target_max_collision(mut self, target: u32) -> Self {
        self.config.target_max_collision = target;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn run<'a, I>(&self, keys: I) -> Result<SearchOutcome, SearchError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys = KeySet::new(keys)?;
        self.run_keyset(&keys)
    }

    pub fn run_keyset(&self, keys: &KeySet<'_>) -> Result<SearchOutcome, SearchError> {
        self.config.validate()?;

        let start = Instant::now();
        let staircases = evaluate_with_pool(keys.encoded(), &self.config);
        let improvements = fold_staircases(staircases);
        let elapsed = start.elapsed();

        // Ranges are non-empty, so the first candidate always lands in the trail.
        let best = *improvements
            .last()
            .ok_or_else(|| SearchError::Config("no candidate evaluated".into()))?;

        for c in &improvements {
            info!("{}", c);
        }
        info!(
            "searched {} candidates over {} keys in {:.3}s, best: {}",
            self.config.candidates(),
            keys.len(),
            elapsed.as_secs_f64(),
            best
        );
        if best.metrics.max_collision > self.config.target_max_collision {
            warn!(
                "best max collision {} is above the target {}, consider widening the search range",
                best.metrics.max_collision, self.config.target_max_collision
            );
        }

        Ok(SearchOutcome {
            best,
            improvements,
            evaluated: self.config.candidates(),
            elapsed,
        })
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidates for one multiplier that beat everything before them within it.
fn staircase(
    encoded: &[u64],
    index: u32,
    config: &SearchConfig,
    tally: &mut BucketTally,
) -> Vec<Candidate> {
    let multiplier = multiplier_for_index(index);
    let mut steps: Vec<Candidate> = Vec::new();

    for shift in config.shifts.clone() {
        for &modulus in &config.moduli {
            let metrics = tally.measure_raw(encoded, multiplier, shift, modulus);
            if steps.last().map_or(true, |b| metrics.beats(&b.metrics)) {
                steps.push(Candidate {
                    params: HashParams {
                        multiplier,
                        shift,
                        modulus,
                    },
                    metrics,
                });
            }
        }
    }
    steps
}

/// Keeps the steps that beat the running global best, in multiplier order.
fn fold_staircases<I>(staircases: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = Vec<Candidate>>,
{
    let mut trail: Vec<Candidate> = Vec::new();
    for steps in staircases {
        for c in steps {
            if trail.last().map_or(true, |best| c.beats(best)) {
                trail.push(c);
            }
        }
    }
    trail
}

fn evaluate_sequential(encoded: &[u64], config: &SearchConfig) -> Vec<Vec<Candidate>> {
    let mut tally = BucketTally::new();
    config
        .multipliers
        .clone()
        .map(|i| staircase(encoded, i, config, &mut tally))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_parallel(encoded: &[u64], config: &SearchConfig) -> Vec<Vec<Candidate>> {
    config
        .multipliers
        .clone()
        .into_par_iter()
        .map_init(BucketTally::new, |tally, i| {
            staircase(encoded, i, config, tally)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_with_pool(encoded: &[u64], config: &SearchConfig) -> Vec<Vec<Candidate>> {
    if !config.parallel {
        return evaluate_sequential(encoded, config);
    }

    match search_threads() {
        Some(threads) => match ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| evaluate_parallel(encoded, config)),
            Err(err) => {
                warn!("could not start {} search threads: {}", threads, err);
                evaluate_parallel(encoded, config)
            }
        },
        None => evaluate_parallel(encoded, config),
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_with_pool(encoded: &[u64], config: &SearchConfig) -> Vec<Vec<Candidate>> {
    evaluate_sequential(encoded, config)
}

#[cfg(feature = "parallel")]
fn search_threads() -> Option<usize> {
    let v = std::env::var_os(THREADS_ENV)?;
    match v.to_string_lossy().trim().parse::<usize>() {
        Ok(parsed) => Some(parsed.max(1)),
        Err(_) => {
            warn!("ignoring {}={:?}, expected a thread count", THREADS_ENV, v);
            None
        }
    }
}
