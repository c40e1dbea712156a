//! param_hash: tiny multiply-shift hash for a fixed set of synth parameter names.
//!
//! - Offline: search `(multiplier, shift, modulus)` so the key set spreads over the
//!   buckets with the smallest possible largest bucket.
//! - Runtime: hash a name with a few integer operations, then compare exactly against
//!   the one to three names stored in its bucket.
//! - Imperfect hashes are fine: lookups never trust the hash alone.

mod build_hasher;
pub mod encoder;
pub mod keyset;
pub mod metrics;
pub mod params;
pub mod search;
pub mod table;

pub use encoder::encode;
pub use keyset::{KeySet, KeySetError};
pub use metrics::BucketMetrics;
pub use params::{HashParams, ParamsError};
pub use search::{Candidate, SearchConfig, SearchError, SearchOutcome, Searcher};
pub use table::{ParamTable, TableError, TableStats};
