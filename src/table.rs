//! Bucketed lookup table keyed by parameter name.
//!
//! The hash only narrows a query down to a bucket; the bucket's few names are then
//! compared exactly, so collisions cost a comparison but never a wrong answer, and
//! names outside the key set are rejected even when they land in a used bucket.

use crate::keyset::{KeySet, KeySetError};
use crate::params::{HashParams, ParamsError};
use crate::search::SearchOutcome;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid key set: {0}")]
    KeySet(#[from] KeySetError),
    #[error("invalid hash parameters: {0}")]
    Params(#[from] ParamsError),
    #[error("key not found")]
    KeyNotFound,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    name: Box<str>,
    value: V,
}

/// Immutable name -> value table, built once from a fixed key set.
#[derive(Debug, Clone)]
pub struct ParamTable<V> {
    params: HashParams,
    /// Bucket `b` owns `slots[offsets[b]..offsets[b + 1]]`.
    offsets: Box<[u32]>,
    slots: Box<[Slot<V>]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub buckets: usize,
    pub occupied: usize,
    pub keys: usize,
    pub max_bucket_len: usize,
    /// Largest bucket holding more than one key, 0 if there is none.
    pub max_collisions: usize,
    /// Mean size of the buckets holding more than one key.
    pub avg_collisions: f64,
    /// Keys per occupied bucket.
    pub avg_bucket_len: f64,
}

impl<V> ParamTable<V> {
    pub fn build<'a, I>(entries: I, params: HashParams) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
    {
        let params = HashParams::new(params.multiplier, params.shift, params.modulus)?;
        let entries: Vec<(&'a str, V)> = entries.into_iter().collect();
        let keys = KeySet::new(entries.iter().map(|&(name, _)| name))?;

        let buckets = params.buckets();
        let mut placed: Vec<(usize, Slot<V>)> = entries
            .into_iter()
            .zip(keys.encoded())
            .map(|((name, value), &encoded)| {
                (
                    params.bucket(encoded),
                    Slot {
                        name: name.into(),
                        value,
                    },
                )
            })
            .collect();
        // Stable, so names keep registry order inside a bucket.
        placed.sort_by_key(|&(bucket, _)| bucket);

        let mut counts = vec![0u32; buckets];
        for &(bucket, _) in &placed {
            counts[bucket] += 1;
        }
        let mut offsets = vec![0u32; buckets + 1];
        for i in 0..buckets {
            offsets[i + 1] = offsets[i] + counts[i];
        }

        let table = Self {
            params,
            offsets: offsets.into_boxed_slice(),
            slots: placed.into_iter().map(|(_, slot)| slot).collect(),
        };
        debug!(
            "built parameter table: {} keys in {} buckets, largest bucket {} ({})",
            table.len(),
            buckets,
            table.max_bucket_len(),
            params
        );
        Ok(table)
    }

    /// Builds with the winning parameters of a search.
    pub fn from_search<'a, I>(entries: I, outcome: &SearchOutcome) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
    {
        Self::build(entries, outcome.params())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&V> {
        let bucket = self.params.bucket_of(name)?;
        self.bucket_slots(bucket)
            .iter()
            .find(|slot| &*slot.name == name)
            .map(|slot| &slot.value)
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Result<&V, TableError> {
        self.get(name).ok_or(TableError::KeyNotFound)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names and values in bucket `index`; empty for an out of range index.
    pub fn bucket(&self, index: usize) -> impl Iterator<Item = (&str, &V)> {
        self.bucket_slots(index)
            .iter()
            .map(|slot| (&*slot.name, &slot.value))
    }

    /// All entries, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots.iter().map(|slot| (&*slot.name, &slot.value))
    }

    pub fn params(&self) -> HashParams {
        self.params
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn max_bucket_len(&self) -> usize {
        self.bucket_lens().max().unwrap_or(0)
    }

    pub fn stats(&self) -> TableStats {
        let mut occupied = 0usize;
        let mut max_bucket_len = 0usize;
        let mut colliding = 0usize;
        let mut colliding_keys = 0usize;

        for len in self.bucket_lens() {
            if len == 0 {
                continue;
            }
            occupied += 1;
            max_bucket_len = max_bucket_len.max(len);
            if len > 1 {
                colliding += 1;
                colliding_keys += len;
            }
        }

        TableStats {
            buckets: self.params.buckets(),
            occupied,
            keys: self.len(),
            max_bucket_len,
            max_collisions: if colliding > 0 { max_bucket_len } else { 0 },
            avg_collisions: ratio(colliding_keys, colliding),
            avg_bucket_len: ratio(self.len(), occupied),
        }
    }

    fn bucket_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.windows(2).map(|w| (w[1] - w[0]) as usize)
    }

    #[inline]
    fn bucket_slots(&self, index: usize) -> &[Slot<V>] {
        match (self.offsets.get(index), self.offsets.get(index + 1)) {
            (Some(&start), Some(&end)) => &self.slots[start as usize..end as usize],
            _ => &[],
        }
    }
}

impl TableStats {
    pub fn print_summary(&self) {
        println!("Parameter table:");
        println!("  Keys: {}", self.keys);
        println!("  Buckets: {} ({} used)", self.buckets, self.occupied);
        println!("  Largest bucket: {}", self.max_bucket_len);
        println!("  Max collisions: {}", self.max_collisions);
        println!("  Avg collisions: {:.2}", self.avg_collisions);
        println!("  Avg bucket size: {:.2}", self.avg_bucket_len);
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
