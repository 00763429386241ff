//! Score writes into today's partition and top-K reads over windows.
//!
//! A window read unions the window's day partitions with weight 1 each into a
//! derived key, then reads the requested rank range off that key. The two
//! steps are separate store calls. In [`DerivedKeyMode::Shared`] the derived
//! key is the same for every caller, so a concurrent rebuild of the same
//! window can land between another caller's union and read. That caller then
//! sees the other rebuild's result. This is a known consistency gap of the
//! shared key scheme; [`DerivedKeyMode::PerRequest`] closes it at the cost of
//! per-request key names.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{RankingError, Result};
use crate::keys::{DAY_KEY_FORMAT, PartitionKeyBuilder};
use crate::models::Entry;
use crate::stores::RankingStore;
use crate::window::Window;

/// Where a window's union is materialised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedKeyMode {
    /// `{namespace}:{label}`, shared by all callers and left in place.
    #[default]
    Shared,
    /// `{namespace}:{label}:{uuid}`, private to one read and deleted after it.
    PerRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Accept negative increments. Redis allows negative scores.
    pub allow_negative_deltas: bool,
    pub derived_keys: DerivedKeyMode,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            allow_negative_deltas: true,
            derived_keys: DerivedKeyMode::Shared,
        }
    }
}

/// Key names a window resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub day_keys: Vec<String>,
    /// `None` for single-day windows, which are read directly.
    pub derived_key: Option<String>,
}

/// Leaderboard for one ranking namespace.
#[derive(Clone)]
pub struct RankingAggregator {
    keys: PartitionKeyBuilder,
    store: Arc<dyn RankingStore>,
    clock: Arc<dyn Clock>,
    options: AggregatorOptions,
}

impl RankingAggregator {
    /// Binds `namespace` to `store`, using the local calendar day as "today".
    pub fn new(namespace: impl Into<String>, store: Arc<dyn RankingStore>) -> Self {
        Self {
            keys: PartitionKeyBuilder::new(namespace),
            store,
            clock: Arc::new(SystemClock::local()),
            options: AggregatorOptions::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_options(mut self, options: AggregatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn keys(&self) -> &PartitionKeyBuilder {
        &self.keys
    }

    pub fn options(&self) -> AggregatorOptions {
        self.options
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.store.health_check().await?)
    }

    /// Adds `delta` to `identity`'s score in today's partition and returns the
    /// new score. Concurrent increments are serialised by the store.
    pub async fn add_score(&self, identity: &str, delta: f64) -> Result<f64> {
        if !delta.is_finite() {
            return Err(RankingError::invalid(format!(
                "score delta must be finite, got {delta}"
            )));
        }
        if delta < 0.0 && !self.options.allow_negative_deltas {
            return Err(RankingError::invalid(format!(
                "negative score delta {delta} is not allowed"
            )));
        }

        let key = self.keys.day_key(self.today());
        let score = self.store.incr_score(&key, identity, delta).await?;

        tracing::debug!(key = %key, identity = %identity, delta, score, "score added");
        Ok(score)
    }

    /// Adds 1 to `identity`'s score for today.
    pub async fn increment(&self, identity: &str) -> Result<f64> {
        self.add_score(identity, 1.0).await
    }

    /// Ranks `start..=stop` (0-based) of one day's partition. A day without
    /// writes yields an empty list.
    pub async fn top_k_one_day(
        &self,
        date: NaiveDate,
        start: usize,
        stop: usize,
    ) -> Result<Vec<Entry>> {
        check_range(start, stop)?;

        let key = self.keys.day_key(date);
        self.read_range(&key, start, stop).await
    }

    /// Unions the partitions of `dates` with equal weights into the derived
    /// key for `label`, overwriting it, then ranks `start..=stop` of the result.
    ///
    /// Days without writes contribute nothing. If none of them exist the
    /// result is empty.
    pub async fn top_k_window(
        &self,
        dates: &[NaiveDate],
        label: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<Entry>> {
        if dates.is_empty() {
            return Err(RankingError::invalid("window dates must not be empty"));
        }
        check_label(label)?;
        check_range(start, stop)?;

        let sources = self.keys.day_keys(dates);
        let weights = vec![1.0; sources.len()];
        let destination = self.destination_key(label);

        let members = self
            .store
            .union_store(&destination, &sources, &weights)
            .await?;
        tracing::debug!(
            destination = %destination,
            partitions = sources.len(),
            members,
            "window union stored"
        );

        let result = self.read_range(&destination, start, stop).await;

        if self.options.derived_keys == DerivedKeyMode::PerRequest
            && let Err(e) = self.store.delete(&destination).await
        {
            tracing::warn!(
                destination = %destination,
                error = %e,
                "Failed to delete per-request window key"
            );
        }

        result
    }

    /// Ranks `start..=stop` of `window`, relative to today.
    pub async fn top(&self, window: Window, start: usize, stop: usize) -> Result<Vec<Entry>> {
        let dates = window.dates(self.today())?;
        match window.derived_label() {
            Some(label) => self.top_k_window(&dates, &label, start, stop).await,
            None => {
                let [date] = dates.as_slice() else {
                    return Err(RankingError::invalid(format!(
                        "window {window} does not resolve to a single day"
                    )));
                };
                self.top_k_one_day(*date, start, stop).await
            }
        }
    }

    /// The `n` highest entries of `window`.
    pub async fn top_n(&self, window: Window, n: usize) -> Result<Vec<Entry>> {
        let stop = last_rank(n)?;
        self.top(window, 0, stop).await
    }

    pub async fn today_top(&self, n: usize) -> Result<Vec<Entry>> {
        self.top_n(Window::Today, n).await
    }

    pub async fn yesterday_top(&self, n: usize) -> Result<Vec<Entry>> {
        self.top_n(Window::Yesterday, n).await
    }

    pub async fn yesterday_top10(&self) -> Result<Vec<Entry>> {
        self.yesterday_top(10).await
    }

    /// Top 10 of Monday through Sunday of the current week.
    pub async fn current_week_top10(&self) -> Result<Vec<Entry>> {
        self.top_n(Window::CurrentWeek, 10).await
    }

    /// Top 10 of every day of the current month.
    pub async fn current_month_top10(&self) -> Result<Vec<Entry>> {
        self.top_n(Window::CurrentMonth, 10).await
    }

    pub async fn last_7_days_top(&self, n: usize) -> Result<Vec<Entry>> {
        self.top_n(Window::LastDays(7), n).await
    }

    pub async fn last_30_days_top(&self, n: usize) -> Result<Vec<Entry>> {
        self.top_n(Window::LastDays(30), n).await
    }

    /// Key names `window` reads from, relative to today. Issues no store call.
    pub fn resolve(&self, window: Window) -> Result<ResolvedWindow> {
        let dates = window.dates(self.today())?;
        Ok(ResolvedWindow {
            day_keys: self.keys.day_keys(&dates),
            derived_key: window
                .derived_label()
                .map(|label| self.keys.derived_key(&label)),
        })
    }

    fn destination_key(&self, label: &str) -> String {
        let key = self.keys.derived_key(label);
        match self.options.derived_keys {
            DerivedKeyMode::Shared => key,
            DerivedKeyMode::PerRequest => format!("{}:{}", key, Uuid::new_v4().simple()),
        }
    }

    async fn read_range(&self, key: &str, start: usize, stop: usize) -> Result<Vec<Entry>> {
        let entries = self.store.rev_range_with_scores(key, start, stop).await?;
        Ok(entries.into_iter().map(Entry::from).collect())
    }
}

/// Ranks must fit the store's signed index type.
const MAX_RANK: usize = isize::MAX as usize;

fn check_range(start: usize, stop: usize) -> Result<()> {
    if start > stop {
        return Err(RankingError::invalid(format!(
            "rank range start {start} is after stop {stop}"
        )));
    }
    if stop > MAX_RANK {
        return Err(RankingError::invalid(format!(
            "rank range stop {stop} exceeds {MAX_RANK}"
        )));
    }
    Ok(())
}

/// A derived label must not name a day partition, or the union would
/// overwrite real scores.
fn check_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(RankingError::invalid("derived label must not be empty"));
    }
    if NaiveDate::parse_from_str(label, DAY_KEY_FORMAT).is_ok() {
        return Err(RankingError::invalid(format!(
            "derived label {label:?} collides with a day partition"
        )));
    }
    Ok(())
}

fn last_rank(n: usize) -> Result<usize> {
    n.checked_sub(1)
        .ok_or_else(|| RankingError::invalid("top-N requires N of at least 1"))
}
