use crate::backend::BitmapBackend;
use crate::bitmap::BitStore;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::hash::{optimal_bit_vector_size, optimal_num_hashes};
use async_trait::async_trait;
use std::sync::Arc;

/// Approximate membership capability over string items.
///
/// False positives are possible; false negatives are not, until the
/// backing data is rotated or expired away.
#[async_trait]
pub trait Filter: Send + Sync {
    async fn add(&self, item: &str) -> Result<()>;
    async fn exist(&self, item: &str) -> Result<bool>;
}

/// Bloom filter over a [`BitStore`]: k double-hashed positions per item,
/// set and checked in one batched backend round trip each.
pub struct BloomFilter {
    bits: BitStore,
    config: FilterConfig,
    num_hashes: usize,
}

impl BloomFilter {
    /// Builds the filter and its backing bit vector. Vector size and hash
    /// count are derived from the configured capacity and false positive
    /// rate.
    pub async fn new(
        backend: Arc<dyn BitmapBackend>,
        config: FilterConfig,
    ) -> Result<Self> {
        config.validate()?;
        let size = optimal_bit_vector_size(
            config.capacity,
            config.false_positive_rate,
        );
        let num_hashes =
            optimal_num_hashes(config.capacity, size).max(1);
        let bits =
            BitStore::new(backend, &config.name, size, config.ttl).await?;
        Ok(Self {
            bits,
            config,
            num_hashes,
        })
    }

    /// The store backing this filter
    pub fn bit_store(&self) -> &BitStore {
        &self.bits
    }

    fn positions(&self, item: &str) -> Vec<u64> {
        (self.config.hash_function)(item.as_bytes(), self.num_hashes)
    }
}

#[async_trait]
impl Filter for BloomFilter {
    async fn add(&self, item: &str) -> Result<()> {
        self.bits.set_bits(&self.positions(item)).await
    }

    async fn exist(&self, item: &str) -> Result<bool> {
        self.bits.check_bits(&self.positions(item)).await
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ key: {}, size: {}, num_hashes: {}, false_positive_rate: {} }}",
            self.bits.key(),
            self.bits.size(),
            self.num_hashes,
            self.config.false_positive_rate
        )
    }
}
