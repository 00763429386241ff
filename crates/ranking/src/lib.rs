//! Time-windowed leaderboards over per-day sorted sets.
//!
//! Scores are written into one sorted set per namespace and calendar day.
//! Rankings over several days are computed on read by unioning the day sets
//! into a derived set and reading a rank range off it.
//!
//! ## Modules
//!
//! - **keys** - Day-key and derived-key naming
//! - **window** - Which days a window (yesterday, last N days, week, month) spans
//! - **clock** - Source of "today"
//! - **stores** - Sorted-set store trait with Redis and in-memory backends
//! - **aggregator** - Score writes and top-K reads
//!
//! ## Usage
//!
//! ```ignore
//! let client = redis::Client::open("redis://127.0.0.1/")?;
//! let rankings = RankingAggregator::new("articles", Arc::new(RedisRankingStore::new(client)));
//!
//! rankings.add_score("post42", 5.0).await?;
//! let week = rankings.current_week_top10().await?;
//! ```

pub mod aggregator;
pub mod clock;
pub mod error;
pub mod keys;
pub mod models;
pub mod stores;
#[cfg(test)]
mod test_utils;
pub mod window;

pub use aggregator::{AggregatorOptions, DerivedKeyMode, RankingAggregator, ResolvedWindow};
pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use error::RankingError;
pub use keys::PartitionKeyBuilder;
pub use models::Entry;
pub use stores::{MemoryRankingStore, RankingStore, RedisRankingStore};
pub use window::Window;
