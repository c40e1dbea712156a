use crate::params::{bucket_index, HashParams};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bucket distribution of a whole key set under one parameter choice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketMetrics {
    pub keys: u32,
    pub occupied: u32,
    pub max_collision: u32,
}

impl BucketMetrics {
    /// Keys per occupied bucket.
    pub fn avg_occupancy(&self) -> f64 {
        if self.occupied == 0 {
            return 0.0;
        }
        self.keys as f64 / self.occupied as f64
    }

    pub fn is_perfect(&self) -> bool {
        self.max_collision <= 1
    }

    /// Strictly better: lower max collision, then lower average occupancy.
    ///
    /// Occupancies always sum to `keys`, so for equal key counts a lower average
    /// is the same as more occupied buckets.
    #[inline]
    pub fn beats(&self, other: &BucketMetrics) -> bool {
        if self.max_collision != other.max_collision {
            return self.max_collision < other.max_collision;
        }
        // keys / occupied < other.keys / other.occupied, cross-multiplied.
        (self.keys as u64) * (other.occupied as u64) < (other.keys as u64) * (self.occupied as u64)
    }
}

/// Reusable per-bucket counters, so evaluating a candidate never allocates.
#[derive(Debug, Clone, Default)]
pub struct BucketTally {
    counts: Vec<u32>,
}

impl BucketTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measure(&mut self, encoded: &[u64], params: &HashParams) -> BucketMetrics {
        self.measure_raw(encoded, params.multiplier, params.shift, params.modulus)
    }

    #[inline]
    pub(crate) fn measure_raw(
        &mut self,
        encoded: &[u64],
        multiplier: u64,
        shift: u32,
        modulus: u32,
    ) -> BucketMetrics {
        let buckets = modulus as usize;
        self.counts.clear();
        self.counts.resize(buckets, 0);

        let mut occupied = 0u32;
        let mut max_collision = 0u32;
        for &e in encoded {
            let slot = &mut self.counts[bucket_index(e, multiplier, shift, modulus)];
            if *slot == 0 {
                occupied += 1;
            }
            *slot += 1;
            max_collision = max_collision.max(*slot);
        }

        BucketMetrics {
            keys: encoded.len() as u32,
            occupied,
            max_collision,
        }
    }
}
