use async_trait::async_trait;
use rotating_bloom_rs::{
    BitmapBackend, BloomFilter, Filter, FilterConfig, FilterConfigBuilder,
    FilterFactory, InMemoryBackend, Result, RotationContext, Rotator,
    RotatorConfigBuilder,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const ROTATION_FREQ: Duration = Duration::from_secs(2);

struct DemoFactory {
    backend: Arc<InMemoryBackend>,
    config: FilterConfig,
}

#[async_trait]
impl FilterFactory for DemoFactory {
    async fn new_filter(
        &self,
        ctx: RotationContext,
    ) -> Result<Arc<dyn Filter>> {
        info!(?ctx, "building filter generation");
        let filter = BloomFilter::new(
            Arc::clone(&self.backend) as Arc<dyn BitmapBackend>,
            self.config.clone(),
        )
        .await?;
        Ok(Arc::new(filter))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    let factory = Arc::new(DemoFactory {
        backend: Arc::new(InMemoryBackend::new()),
        config: FilterConfigBuilder::default()
            .name("demo".to_string())
            .capacity(10_000)
            // outlives the next and current phases of each generation
            .ttl(Some(ROTATION_FREQ * 3))
            .build()
            .expect("Failed to build filter config"),
    });

    let cancel = CancellationToken::new();
    let cfg = RotatorConfigBuilder::default()
        .frequency(ROTATION_FREQ)
        .build()
        .expect("Failed to build rotator config");
    let rotator = Rotator::new(cancel.clone(), cfg, factory as _).await?;

    rotator.add("cherry").await?;
    rotator.add("banana").await?;

    for round in 0..5 {
        for item in ["cherry", "banana", "durian"] {
            let seen = rotator.exist(item).await?;
            info!(round, item, seen, "membership check");
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    cancel.cancel();
    info!("done");
    Ok(())
}
