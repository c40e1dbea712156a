use crate::encoder;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Multiply-shift-modulo hash parameters.
///
/// `bucket = ((encoded * multiplier) >> shift) % modulus`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashParams {
    pub multiplier: u64,
    pub shift: u32,
    pub modulus: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("multiplier must be odd, got {0}")]
    EvenMultiplier(u64),
    #[error("shift must be below 64, got {0}")]
    ShiftTooLarge(u32),
    #[error("modulus must be positive")]
    ZeroModulus,
}

impl HashParams {
    pub fn new(multiplier: u64, shift: u32, modulus: u32) -> Result<Self, ParamsError> {
        if multiplier % 2 == 0 {
            return Err(ParamsError::EvenMultiplier(multiplier));
        }
        if shift >= u64::BITS {
            return Err(ParamsError::ShiftTooLarge(shift));
        }
        if modulus == 0 {
            return Err(ParamsError::ZeroModulus);
        }
        Ok(Self {
            multiplier,
            shift,
            modulus,
        })
    }

    /// Parameters for search index `index`, whose multiplier is `2 * index + 1`.
    pub fn from_search_index(index: u32, shift: u32, modulus: u32) -> Result<Self, ParamsError> {
        Self::new(multiplier_for_index(index), shift, modulus)
    }

    #[inline(always)]
    pub fn bucket(&self, encoded: u64) -> usize {
        bucket_index(encoded, self.multiplier, self.shift, self.modulus)
    }

    /// Encodes `key` and hashes it. `None` if the key can't be encoded.
    #[inline]
    pub fn bucket_of(&self, key: &str) -> Option<usize> {
        encoder::encode(key).map(|e| self.bucket(e))
    }

    pub fn buckets(&self) -> usize {
        self.modulus as usize
    }
}

impl fmt::Display for HashParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "multiplier={}\tshift={}\tmod={}",
            self.multiplier, self.shift, self.modulus
        )
    }
}

#[inline(always)]
pub fn multiplier_for_index(index: u32) -> u64 {
    (index as u64) * 2 + 1
}

#[inline(always)]
pub(crate) fn bucket_index(encoded: u64, multiplier: u64, shift: u32, modulus: u32) -> usize {
    ((encoded.wrapping_mul(multiplier) >> shift) % modulus as u64) as usize
}
