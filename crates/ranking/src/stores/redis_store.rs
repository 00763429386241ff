//! Ranking storage for Redis (sorted sets).

use anyhow::{Result, ensure};
use async_trait::async_trait;
use redis::AsyncCommands;

use super::RankingStore;

/// Redis implementation of RankingStore.
///
/// The client is owned by the caller; a multiplexed connection is obtained
/// per operation.
#[derive(Clone)]
pub struct RedisRankingStore {
    client: redis::Client,
}

impl RedisRankingStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RankingStore for RedisRankingStore {
    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(result == "PONG")
    }

    async fn incr_score(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let score: f64 = conn.zincr(key, member, delta).await?;
        Ok(score)
    }

    async fn rev_range_with_scores(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<(String, f64)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let entries: Vec<(String, f64)> = conn
            .zrevrange_withscores(key, isize::try_from(start)?, isize::try_from(stop)?)
            .await?;
        Ok(entries)
    }

    async fn union_store(
        &self,
        destination: &str,
        keys: &[String],
        weights: &[f64],
    ) -> Result<u64> {
        ensure!(
            keys.len() == weights.len(),
            "{} keys but {} weights",
            keys.len(),
            weights.len()
        );
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let count: u64 = redis::cmd("ZUNIONSTORE")
            .arg(destination)
            .arg(keys.len())
            .arg(keys)
            .arg("WEIGHTS")
            .arg(weights)
            .arg("AGGREGATE")
            .arg("SUM")
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: () = conn.del(key).await?;
        Ok(())
    }
}
