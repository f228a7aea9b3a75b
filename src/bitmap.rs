use crate::backend::BitmapBackend;
use crate::error::{BloomError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

// Process-wide stamp tail so back-to-back stores cannot collide even when
// the wall clock is coarser than a nanosecond.
static STORE_SEQ: AtomicU64 = AtomicU64::new(0);

/// One remote bit vector of fixed size, addressed through a generated key.
///
/// The key is `"{name}_{nanos}_{seq}"`: the stable logical name plus an
/// instantiation stamp, so no two stores ever alias the same remote data
/// even when built from the same name. Retired vectors are reclaimed only
/// by the backend TTL given at construction; there is no explicit delete.
pub struct BitStore {
    backend: Arc<dyn BitmapBackend>,
    key: String,
    size: u64,
}

impl BitStore {
    /// Creates the store, materializes its key on the backend and applies
    /// the optional TTL.
    pub async fn new(
        backend: Arc<dyn BitmapBackend>,
        name: &str,
        size: u64,
        ttl: Option<Duration>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(BloomError::InvalidConfig(
                "Bit vector size must be > 0".into(),
            ));
        }
        let key = generate_key(name)?;
        // An expiry against a key holding no data yet can be a no-op, so
        // write an empty bit before applying the TTL.
        backend.clear_bit(&key, 0).await?;
        if let Some(ttl) = ttl {
            backend.expire(&key, ttl).await?;
        }
        debug!(key = %key, size, ?ttl, "created bit store");
        Ok(Self { backend, key, size })
    }

    /// Remote key owning this bit vector
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of addressable bits
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns whether every position reads as set.
    ///
    /// Positions are folded into range mod the vector size and fetched in
    /// one batched round trip; any unset bit yields `false`. An I/O
    /// failure aborts the whole check. Empty input is vacuously true and
    /// performs no I/O.
    pub async fn check_bits(&self, positions: &[u64]) -> Result<bool> {
        if positions.is_empty() {
            return Ok(true);
        }
        let folded = self.fold(positions);
        let bits = self.backend.get_bits(&self.key, &folded).await?;
        Ok(bits.into_iter().all(|bit| bit))
    }

    /// Sets every position to 1, folded mod the vector size, in one
    /// batched round trip. Already-set bits are idempotent no-ops.
    pub async fn set_bits(&self, positions: &[u64]) -> Result<()> {
        if positions.is_empty() {
            return Ok(());
        }
        let folded = self.fold(positions);
        self.backend.set_bits(&self.key, &folded).await
    }

    fn fold(&self, positions: &[u64]) -> Vec<u64> {
        positions.iter().map(|pos| pos % self.size).collect()
    }
}

fn generate_key(name: &str) -> Result<String> {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let seq = STORE_SEQ.fetch_add(1, Ordering::Relaxed);
    Ok(format!("{name}_{nanos}_{seq}"))
}
