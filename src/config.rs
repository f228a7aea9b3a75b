use crate::error::{BloomError, Result};
use crate::hash::{HashFunction, default_hash_function};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a rotating filter derives the remote keys of its backing bit
/// vectors. The rotation core never branches on the mode; it is carried
/// inside [`RotationContext`](crate::RotationContext) for the filter
/// constructor to interpret.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Every filter generation keys its bit vector off the unique
    /// instantiation stamp alone
    #[default]
    Unique,
    /// Keys additionally encode the window-aligned rotation instant, so
    /// cooperating processes can converge on shared generations
    WindowAligned,
}

/// Configuration for a [`BloomFilter`](crate::BloomFilter).
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Logical name used as the key prefix of backing bit vectors
    #[builder(default = "\"bloom\".to_string()")]
    pub name: String,

    /// Maximum number of elements the filter is sized for
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Desired false positive rate (between 0 and 1)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,

    /// Backend TTL applied to the backing bit vector; `None` keeps the
    /// data until the backend is flushed. Under rotation this should
    /// outlive at least two rotation windows, since a filter serves both
    /// a "next" and a "current" phase.
    #[builder(default = "None")]
    pub ttl: Option<Duration>,

    /// Hash function producing raw bit positions
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(BloomError::InvalidConfig(
                "Filter name must not be empty".into(),
            ));
        }
        if self.capacity == 0 {
            return Err(BloomError::InvalidConfig(
                "Capacity must be > 0".into(),
            ));
        }
        if self.false_positive_rate <= 0.0 || self.false_positive_rate >= 1.0
        {
            return Err(BloomError::InvalidConfig(
                "FPR must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a [`Rotator`](crate::Rotator).
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct RotatorConfig {
    /// Forwarded to the filter constructor as rotation metadata
    #[builder(default = "true")]
    pub enable: bool,

    /// Key derivation mode, forwarded to the filter constructor
    #[builder(default)]
    pub mode: RotationMode,

    /// Rotation period. Boundaries are aligned to wall-clock multiples of
    /// it, so independently started rotators sharing a frequency rotate
    /// at the same instants.
    #[builder(default = "Duration::from_secs(3600)")]
    pub frequency: Duration,
}

impl RotatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frequency.is_zero() {
            return Err(BloomError::InvalidConfig(
                "Rotation frequency must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
