#![allow(dead_code)]

use async_trait::async_trait;
use rotating_bloom_rs::{
    BitmapBackend, BloomFilter, Filter, FilterConfig, FilterConfigBuilder,
    FilterFactory, InMemoryBackend, Result, RotationContext,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Factory building real Bloom filters over one shared in-memory backend,
/// counting how many generations it has produced.
pub struct MemoryBloomFactory {
    backend: Arc<InMemoryBackend>,
    config: FilterConfig,
    builds: AtomicUsize,
}

impl MemoryBloomFactory {
    pub fn new(capacity: usize) -> Self {
        let config = FilterConfigBuilder::default()
            .name("itest".to_string())
            .capacity(capacity)
            .build()
            .expect("Failed to build test config");
        Self {
            backend: Arc::new(InMemoryBackend::new()),
            config,
            builds: AtomicUsize::new(0),
        }
    }

    pub fn backend(&self) -> Arc<InMemoryBackend> {
        Arc::clone(&self.backend)
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilterFactory for MemoryBloomFactory {
    async fn new_filter(
        &self,
        _ctx: RotationContext,
    ) -> Result<Arc<dyn Filter>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let filter = BloomFilter::new(
            Arc::clone(&self.backend) as Arc<dyn BitmapBackend>,
            self.config.clone(),
        )
        .await?;
        Ok(Arc::new(filter))
    }
}

/// Sleeps until `offset` past the next wall-clock multiple of `freq`, so
/// timing-sensitive assertions start phase-aligned with the rotator.
pub async fn sleep_past_next_boundary(freq: Duration, offset: Duration) {
    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    let freq_ns = freq.as_nanos();
    let boundary = ((now_ns + freq_ns) / freq_ns) * freq_ns;
    let wait = Duration::from_nanos((boundary - now_ns) as u64) + offset;
    tokio::time::sleep(wait).await;
}
