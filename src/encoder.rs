//! Key encoder: folds a parameter name into a small integer.
//!
//! Only the 36 characters used in parameter names matter (capital letters and
//! digits), so each one is a base-36 digit. The first character is skipped since
//! nearly every name shares it, the next [`SCAN_WINDOW`] characters are packed most
//! significant first, and the index of the last scanned character goes into the
//! low [`LENGTH_BITS`] bits.

/// Number of distinct characters in a parameter name.
pub const ALPHABET_SIZE: u64 = 36;

/// Characters read after the skipped first one.
pub const SCAN_WINDOW: usize = 5;

/// Low bits reserved for the scanned-length counter.
pub const LENGTH_BITS: u32 = 3;

const LETTER_OFFSET: u8 = b'A' - 10;
const DIGIT_OFFSET: u8 = b'0';

/// Largest value [`encode`] can return.
pub const MAX_ENCODED: u64 =
    ((ALPHABET_SIZE.pow(SCAN_WINDOW as u32) - 1) << LENGTH_BITS) | (SCAN_WINDOW as u64 - 1);

/// Maps `A-Z` to 10..=35 and `0-9` to 0..=9.
#[inline(always)]
pub fn char_value(c: u8) -> Option<u64> {
    match c {
        b'A'..=b'Z' => Some((c - LETTER_OFFSET) as u64),
        b'0'..=b'9' => Some((c - DIGIT_OFFSET) as u64),
        _ => None,
    }
}

#[inline(always)]
pub fn is_key_char(c: u8) -> bool {
    char_value(c).is_some()
}

/// Encodes a parameter name. Returns `None` if a scanned character is outside the
/// alphabet; characters past the window are never looked at.
#[inline]
pub fn encode(key: &str) -> Option<u64> {
    encode_bytes(key.as_bytes())
}

#[inline]
pub fn encode_bytes(key: &[u8]) -> Option<u64> {
    let window = match key.get(1..) {
        Some(rest) => &rest[..rest.len().min(SCAN_WINDOW)],
        None => return Some(0),
    };

    let mut acc = 0u64;
    for &c in window {
        acc = acc * ALPHABET_SIZE + char_value(c)?;
    }

    // Index of the last scanned character, 0 when nothing was scanned.
    let last = window.len().saturating_sub(1) as u64;

    Some((acc << LENGTH_BITS) | last)
}
