use crate::build_hasher::NameBuildHasher;
use crate::encoder;
use hashbrown::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeySetError {
    #[error("key set is empty")]
    Empty,
    #[error("key #{index} is an empty string")]
    EmptyKey { index: usize },
    #[error("key {key:?} has {ch:?} at position {position}, only A-Z and 0-9 are allowed")]
    InvalidCharacter {
        key: String,
        ch: char,
        position: usize,
    },
    #[error("duplicate key {0:?}")]
    DuplicateKey(String),
}

/// A validated key set: non-empty, duplicate-free, restricted alphabet.
///
/// Keeps the registry order and the encoded form of every key.
#[derive(Debug, Clone)]
pub struct KeySet<'a> {
    keys: Vec<&'a str>,
    encoded: Vec<u64>,
}

impl<'a> KeySet<'a> {
    pub fn new<I>(keys: I) -> Result<Self, KeySetError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys: Vec<&'a str> = keys.into_iter().collect();
        if keys.is_empty() {
            return Err(KeySetError::Empty);
        }

        let mut seen: HashSet<&str, NameBuildHasher> =
            HashSet::with_capacity_and_hasher(keys.len(), NameBuildHasher::default());
        let mut encoded = Vec::with_capacity(keys.len());

        for (index, &key) in keys.iter().enumerate() {
            validate_key(index, key)?;
            if !seen.insert(key) {
                return Err(KeySetError::DuplicateKey(key.to_owned()));
            }
            // Every byte was checked above, so the window always encodes.
            encoded.push(encoder::encode(key).unwrap_or_default());
        }

        Ok(Self { keys, encoded })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    pub fn encoded(&self) -> &[u64] {
        &self.encoded
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, u64)> + '_ {
        self.keys.iter().copied().zip(self.encoded.iter().copied())
    }
}

fn validate_key(index: usize, key: &str) -> Result<(), KeySetError> {
    if key.is_empty() {
        return Err(KeySetError::EmptyKey { index });
    }
    if let Some((position, ch)) = key
        .char_indices()
        .find(|&(_, ch)| !ch.is_ascii() || !encoder::is_key_char(ch as u8))
    {
        return Err(KeySetError::InvalidCharacter {
            key: key.to_owned(),
            ch,
            position,
        });
    }
    Ok(())
}
