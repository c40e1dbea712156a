//! Hasher for the duplicate check over parameter names.
//!
//! Names are a handful of ASCII bytes, so a splitmix-style fold is plenty and avoids
//! SipHash's setup cost when the key set is validated on every build.

use std::hash::{BuildHasherDefault, Hasher};

pub type NameBuildHasher = BuildHasherDefault<NameHasher>;

#[derive(Default)]
pub struct NameHasher {
    state: u64,
}

impl Hasher for NameHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        // `str` hashing writes the bytes and then a 0xff terminator, so fold instead
        // of overwriting.
        self.state = splitmix64(self.state ^ fold_bytes(bytes));
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

#[inline]
fn fold_bytes(bytes: &[u8]) -> u64 {
    let mut h = 0x9E37_79B9_7F4A_7C15u64 ^ (bytes.len() as u64).wrapping_mul(0xA24B_1F6F);
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        h = splitmix64(h ^ u64::from_le_bytes(word));
    }
    h
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
