use crate::backend::BitmapBackend;
use crate::error::Result;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::debug;

/// Bitmap backend over Redis GETBIT/SETBIT, batched through pipelines.
///
/// All handles clone one multiplexed connection, so concurrent filters
/// share a single TCP stream while each pipeline is still executed as one
/// round trip.
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    /// Connects to the given Redis URL, e.g. `redis://127.0.0.1/`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        debug!(url, "connected redis bitmap backend");
        Ok(Self { conn })
    }
}

#[async_trait]
impl BitmapBackend for RedisBackend {
    async fn get_bits(
        &self,
        key: &str,
        positions: &[u64],
    ) -> Result<Vec<bool>> {
        let mut pipe = redis::pipe();
        for &pos in positions {
            pipe.getbit(key, pos as usize);
        }
        let mut conn = self.conn.clone();
        let bits: Vec<bool> = pipe.query_async(&mut conn).await?;
        Ok(bits)
    }

    async fn set_bits(&self, key: &str, positions: &[u64]) -> Result<()> {
        let mut pipe = redis::pipe();
        for &pos in positions {
            pipe.setbit(key, pos as usize, true).ignore();
        }
        let mut conn = self.conn.clone();
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn clear_bit(&self, key: &str, position: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: bool = conn.setbit(key, position as usize, false).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: bool = conn.pexpire(key, ttl.as_millis() as i64).await?;
        Ok(())
    }
}
