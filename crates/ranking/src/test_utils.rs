//! Shared helpers for ranking tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::aggregator::RankingAggregator;
use crate::clock::FixedClock;
use crate::stores::MemoryRankingStore;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// An aggregator over a fresh in-memory store, pinned to `today`.
/// The store is returned too so tests can seed and inspect it directly.
pub fn memory_aggregator(
    namespace: &str,
    today: NaiveDate,
) -> (RankingAggregator, Arc<MemoryRankingStore>) {
    let store = Arc::new(MemoryRankingStore::new());
    let aggregator = RankingAggregator::new(namespace, store.clone())
        .with_clock(Arc::new(FixedClock(today)));
    (aggregator, store)
}
