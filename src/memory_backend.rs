use crate::backend::BitmapBackend;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry {
    bits: Vec<bool>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn empty() -> Self {
        Self {
            bits: Vec::new(),
            expires_at: None,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

fn purge_if_expired(entries: &mut HashMap<String, Entry>, key: &str) {
    if entries.get(key).is_some_and(Entry::is_expired) {
        entries.remove(key);
    }
}

/// In-memory bitmap backend.
///
/// Keys expire lazily: an entry past its TTL is dropped on the next access
/// to it. Batched round trips are counted so tests can assert I/O-free
/// fast paths.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
    read_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batched read round trips served so far
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::Relaxed)
    }

    /// Number of batched write round trips served so far
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::Relaxed)
    }

    /// Whether the key currently holds a live (non-expired) entry
    pub async fn contains_key(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key);
        entries.contains_key(key)
    }
}

#[async_trait]
impl BitmapBackend for InMemoryBackend {
    async fn get_bits(
        &self,
        key: &str,
        positions: &[u64],
    ) -> Result<Vec<bool>> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key);
        match entries.get(key) {
            Some(entry) => Ok(positions
                .iter()
                .map(|&pos| {
                    entry.bits.get(pos as usize).copied().unwrap_or(false)
                })
                .collect()),
            None => Ok(vec![false; positions.len()]),
        }
    }

    async fn set_bits(&self, key: &str, positions: &[u64]) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key);
        let entry =
            entries.entry(key.to_string()).or_insert_with(Entry::empty);
        for &pos in positions {
            let idx = pos as usize;
            if entry.bits.len() <= idx {
                entry.bits.resize(idx + 1, false);
            }
            entry.bits[idx] = true;
        }
        Ok(())
    }

    async fn clear_bit(&self, key: &str, position: u64) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key);
        let entry =
            entries.entry(key.to_string()).or_insert_with(Entry::empty);
        let idx = position as usize;
        if entry.bits.len() <= idx {
            entry.bits.resize(idx + 1, false);
        }
        entry.bits[idx] = false;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key);
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }
}
