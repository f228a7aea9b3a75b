use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Storage backend trait for remote bit vectors.
///
/// Keys are opaque strings owned by the caller; positions are already
/// folded into the vector's range. `get_bits` and `set_bits` are evaluated
/// as one batched round trip: a failure anywhere in the batch fails the
/// whole call and no partial result is returned.
#[async_trait]
pub trait BitmapBackend: Send + Sync {
    /// Read the bit at every position, in request order
    async fn get_bits(
        &self,
        key: &str,
        positions: &[u64],
    ) -> Result<Vec<bool>>;

    /// Set every position to 1; already-set bits are no-ops
    async fn set_bits(&self, key: &str, positions: &[u64]) -> Result<()>;

    /// Write an explicit 0, materializing the key on backends where an
    /// expiry against a missing key is a no-op
    async fn clear_bit(&self, key: &str, position: u64) -> Result<()>;

    /// Schedule automatic removal of the key after `ttl`
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;
}
