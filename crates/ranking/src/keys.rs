//! Key naming for daily partitions and derived window sets.
//!
//! ```text
//! {namespace}:{YYYYMMDD}            → per-day sorted set (identity → score)
//! {namespace}:rank:current_week     → scratch union for the calendar week
//! {namespace}:rank:current_month    → scratch union for the calendar month
//! {namespace}:rank:last_{n}Days     → scratch union for the trailing n days
//! ```
//!
//! These names are shared with any existing data and must not change.

use chrono::NaiveDate;

/// Separator between the namespace and the rest of the key.
pub const KEY_DELIMITER: char = ':';

/// `chrono` format of the date suffix in a day-key.
pub const DAY_KEY_FORMAT: &str = "%Y%m%d";

/// Builds key names for one ranking namespace.
///
/// The namespace is treated as opaque: it may itself contain the delimiter.
/// Day-keys stay unambiguous because the date suffix never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionKeyBuilder {
    namespace: String,
}

impl PartitionKeyBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `{namespace}:{YYYYMMDD}`
    pub fn day_key(&self, date: NaiveDate) -> String {
        format!(
            "{}{}{}",
            self.namespace,
            KEY_DELIMITER,
            date.format(DAY_KEY_FORMAT)
        )
    }

    /// Day-keys for `dates`, in the same order.
    pub fn day_keys(&self, dates: &[NaiveDate]) -> Vec<String> {
        dates.iter().map(|date| self.day_key(*date)).collect()
    }

    /// `{namespace}:{label}`, e.g. `articles:rank:current_week`.
    pub fn derived_key(&self, label: &str) -> String {
        format!("{}{}{}", self.namespace, KEY_DELIMITER, label)
    }
}

/// Formats a date the way it appears in a day-key.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}
