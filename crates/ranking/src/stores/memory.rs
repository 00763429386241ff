//! In-process ranking storage.
//!
//! Mirrors the Redis sorted-set semantics the aggregator relies on, including
//! the equal-score ordering, so it can stand in for Redis in tests and in
//! single-process embeddings.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail, ensure};
use async_trait::async_trait;

use super::RankingStore;

type SortedSet = HashMap<String, f64>;

/// In-memory implementation of RankingStore.
#[derive(Default)]
pub struct MemoryRankingStore {
    sets: Mutex<HashMap<String, SortedSet>>,
}

impl MemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a set currently exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().map(|sets| sets.contains_key(key)).unwrap_or(false)
    }

    /// All keys currently holding a set, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|sets| sets.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SortedSet>>> {
        self.sets
            .lock()
            .map_err(|_| anyhow!("memory ranking store lock poisoned"))
    }
}

/// Descending score, then descending identity bytes.
fn rev_order(a: &(String, f64), b: &(String, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| b.0.as_bytes().cmp(a.0.as_bytes()))
}

#[async_trait]
impl RankingStore for MemoryRankingStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(self.lock().is_ok())
    }

    async fn incr_score(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut sets = self.lock()?;

        let current = sets
            .get(key)
            .and_then(|set| set.get(member))
            .copied()
            .unwrap_or(0.0);
        let score = current + delta;
        // A failed ZINCRBY leaves no key behind.
        if score.is_nan() {
            bail!("resulting score is not a number (NaN)");
        }

        sets.entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(score)
    }

    async fn rev_range_with_scores(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<(String, f64)>> {
        let sets = self.lock()?;
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };
        if start > stop || start >= set.len() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<(String, f64)> = set
            .iter()
            .map(|(member, score)| (member.clone(), *score))
            .collect();
        entries.sort_by(rev_order);

        let end = stop.saturating_add(1).min(entries.len());
        Ok(entries.drain(start..end).collect())
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

        let mut sets = self.lock()?;
        let mut union = SortedSet::new();
        for (key, weight) in keys.iter().zip(weights) {
            let Some(set) = sets.get(key) else {
                continue;
            };
            for (member, score) in set {
                let weighted = score * weight;
                // Redis treats inf * 0 as 0.
                let weighted = if weighted.is_nan() { 0.0 } else { weighted };
                *union.entry(member.clone()).or_insert(0.0) += weighted;
            }
        }

        let count = union.len() as u64;
        if union.is_empty() {
            sets.remove(destination);
        } else {
            sets.insert(destination.to_string(), union);
        }
        Ok(count)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
