//! Rotating Bloom filter backed by remote bit-vector storage.
//!
//! This crate provides approximate, time-bounded membership testing for
//! deduplication-style queries ("have we seen this item recently?").
//! Instead of letting one filter grow stale forever, generations of
//! filters are rotated on a timer so storage stays bounded.
//!
//! HowTo:
//!    * Bit vectors: each filter owns one remote bit vector under a
//!      uniquely generated key; checks and writes go out as one batched
//!      (pipelined) round trip.
//!    * Current/next pair: the [`Rotator`] keeps two generations visible
//!      at once. Reads hit `current`; writes go to `current` and to the
//!      pre-warmed `next`.
//!    * Rotation: on every wall-clock boundary aligned to the configured
//!      frequency, `next` is promoted to `current` and a fresh `next` is
//!      built. The pair is replaced atomically, so concurrent callers
//!      never see a half-updated state.
//!    * Expiry: a superseded generation is simply abandoned; the backend
//!      TTL on its key is the sole cleanup mechanism.
//!
//! Insertion:
//!     * `add` hashes the item to k bit positions and sets them in both
//!       generations, so items written late in a window survive exactly
//!       one rotation boundary.
//! Query:
//!     * `exist` checks the k positions in the current generation only.
//! Guarantees:
//!     * False positives are possible (standard Bloom tradeoff).
//!     * False negatives can only appear once an item's generation has
//!       been rotated out twice, a bounded window rather than a bug.
//!
//! Obvious problems:
//!     * An `add` that fails on the `next` generation after succeeding on
//!       `current` reports the error even though `current` was mutated;
//!       such items may vanish at the next boundary.
//!     * Rotation boundaries are wall-clock aligned, so a rotator started
//!       just before a boundary rotates almost immediately.

mod backend;
mod bitmap;
mod config;
mod error;
mod filter;
mod hash;
mod memory_backend;
#[cfg(feature = "redis")]
mod redis_backend;
mod rotator;

pub use backend::BitmapBackend;
pub use bitmap::BitStore;
pub use config::{
    FilterConfig, FilterConfigBuilder, FilterConfigBuilderError,
    RotationMode, RotatorConfig, RotatorConfigBuilder,
    RotatorConfigBuilderError,
};
pub use error::{BloomError, Result};
pub use filter::{BloomFilter, Filter};
pub use hash::{
    HashFunction, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes,
};
pub use memory_backend::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis_backend::RedisBackend;
pub use rotator::{FilterFactory, RotationContext, Rotator};
