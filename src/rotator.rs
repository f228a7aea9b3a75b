use crate::config::{RotationMode, RotatorConfig};
use crate::error::Result;
use crate::filter::Filter;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Rotation metadata handed to the filter constructor on every build.
#[derive(Clone, Copy, Debug)]
pub struct RotationContext {
    /// Mirrors [`RotatorConfig::enable`]
    pub enabled: bool,
    /// True when the filter being built is the pre-warmed next generation
    pub is_next: bool,
    /// Key derivation mode, opaque to the rotation core
    pub mode: RotationMode,
    /// Wall-clock instant of the build
    pub instant: SystemTime,
}

/// Constructs the filter generations a [`Rotator`] cycles through.
#[async_trait]
pub trait FilterFactory: Send + Sync {
    async fn new_filter(
        &self,
        ctx: RotationContext,
    ) -> Result<Arc<dyn Filter>>;
}

// Double buffer of filter generations. `current` answers reads; `next` is
// pre-warmed so writes survive the upcoming rotation boundary. Immutable
// once built; replacement is a single atomic store.
struct FilterPair {
    current: Arc<dyn Filter>,
    next: Arc<dyn Filter>,
}

/// Rotates a current/next filter pair on wall-clock-aligned boundaries
/// while serving concurrent `add`/`exist` traffic.
///
/// Readers and the rotation task synchronize purely through the atomic
/// pair swap; no lock is held across backend I/O. A superseded generation
/// becomes unreachable on rotation and its remote data is reclaimed by
/// the backend TTL alone, so filters should carry a TTL covering at least
/// two rotation windows.
pub struct Rotator {
    cfg: RotatorConfig,
    factory: Arc<dyn FilterFactory>,
    cancel: CancellationToken,
    pair: ArcSwap<FilterPair>,
}

impl Rotator {
    /// Builds the initial current/next pair synchronously, so `add` and
    /// `exist` are usable as soon as this returns, then spawns the
    /// rotation loop. The loop runs until `cancel` fires; the last pair
    /// stays visible after cancellation.
    ///
    /// A construction failure of either initial filter aborts the whole
    /// call and no background task is started.
    pub async fn new(
        cancel: CancellationToken,
        cfg: RotatorConfig,
        factory: Arc<dyn FilterFactory>,
    ) -> Result<Arc<Self>> {
        cfg.validate()?;
        let current =
            factory.new_filter(build_context(&cfg, false)).await?;
        let next = factory.new_filter(build_context(&cfg, true)).await?;
        let rotator = Arc::new(Self {
            pair: ArcSwap::from_pointee(FilterPair { current, next }),
            cfg,
            factory,
            cancel,
        });
        tokio::spawn(Arc::clone(&rotator).run());
        Ok(rotator)
    }

    /// Rotation configuration this instance was built with
    pub fn config(&self) -> &RotatorConfig {
        &self.cfg
    }

    /// Membership check against the current generation.
    pub async fn exist(&self, item: &str) -> Result<bool> {
        let pair = self.pair.load_full();
        pair.current.exist(item).await
    }

    /// Records the item in the current generation and, if that write
    /// succeeds, also in the pre-warmed next generation so the item
    /// survives the upcoming rotation.
    ///
    /// A failed `current` write skips `next` entirely. A failed `next`
    /// write is reported even though `current` was already mutated; the
    /// item is then only guaranteed visible until the next boundary.
    pub async fn add(&self, item: &str) -> Result<()> {
        let pair = self.pair.load_full();
        pair.current.add(item).await?;
        pair.next.add(item).await
    }

    async fn run(self: Arc<Self>) {
        loop {
            let wait =
                until_next_boundary(SystemTime::now(), self.cfg.frequency);
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if let Err(err) = self.rotate().await {
                        warn!(error = %err, "rotation skipped, keeping current filter pair");
                    }
                }
                _ = self.cancel.cancelled() => {
                    debug!("rotation loop stopped");
                    return;
                }
            }
        }
    }

    // Builds the replacement generation first; only a successful build
    // touches the visible pair. Readers either see the old pair or the
    // new one, never anything in between.
    async fn rotate(&self) -> Result<()> {
        let fresh = self
            .factory
            .new_filter(build_context(&self.cfg, true))
            .await?;
        let old = self.pair.load_full();
        self.pair.store(Arc::new(FilterPair {
            current: Arc::clone(&old.next),
            next: fresh,
        }));
        debug!("rotated filter pair");
        Ok(())
    }
}

fn build_context(cfg: &RotatorConfig, is_next: bool) -> RotationContext {
    RotationContext {
        enabled: cfg.enable,
        is_next,
        mode: cfg.mode,
        instant: SystemTime::now(),
    }
}

// Next rotation instant is `now + frequency` truncated down to a multiple
// of `frequency` on the wall clock, so independently started rotators
// sharing a frequency converge on the same boundaries.
fn until_next_boundary(now: SystemTime, frequency: Duration) -> Duration {
    let since_epoch =
        now.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let freq = frequency.as_nanos().max(1);
    let boundary = ((since_epoch + freq) / freq) * freq;
    Duration::from_nanos((boundary - since_epoch) as u64)
}
