//! Ordered-set stores backing the rankings.
//!
//! The aggregator only needs three atomic primitives from a store: increment a
//! member's score, read a rank range in descending score order, and union
//! several sets into a destination with weights. Each is a single store
//! command, so atomicity comes from the store itself.
//!
//! ## Stores
//!
//! - **redis_store** - Redis sorted sets (`ZINCRBY`, `ZREVRANGE`, `ZUNIONSTORE`)
//! - **memory** - Process-local sets with the same ordering rules
//!
//! ## Ordering
//!
//! Ranges are returned highest score first. Members with equal scores come in
//! reverse lexicographic byte order of their identity, which is what Redis
//! `ZREVRANGE` does. The aggregator adds no tie-break of its own.
//!
//! ## Timeouts and retries
//!
//! None are applied here. Connection timeouts, reconnects and retries belong to
//! the store client the caller constructs.

mod memory;
mod redis_store;

pub use memory::MemoryRankingStore;
pub use redis_store::RedisRankingStore;

use anyhow::Result;
use async_trait::async_trait;

/// Ordered-set operations needed by the rankings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankingStore: Send + Sync {
    /// Health check - verify the store is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Atomically add `delta` to `member`'s score in `key`, creating both if
    /// needed. Returns the new score.
    async fn incr_score(&self, key: &str, member: &str, delta: f64) -> Result<f64>;

    /// Members ranked `start..=stop` (0-based) by descending score, with scores.
    /// A missing key yields an empty list.
    async fn rev_range_with_scores(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<(String, f64)>>;

    /// Replace `destination` with the weighted sum of `keys`. Missing keys count
    /// as empty sets. Returns the number of members in the destination.
    async fn union_store(&self, destination: &str, keys: &[String], weights: &[f64])
    -> Result<u64>;

    /// Delete a key if it exists.
    async fn delete(&self, key: &str) -> Result<()>;
}
