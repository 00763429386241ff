//! Source of "today" for partition selection.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Supplies the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Which timezone decides where one day's partition ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    Utc,
    /// The process's local timezone.
    #[default]
    Local,
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    boundary: DayBoundary,
}

impl SystemClock {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }

    pub fn utc() -> Self {
        Self::new(DayBoundary::Utc)
    }

    pub fn local() -> Self {
        Self::new(DayBoundary::Local)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.boundary {
            DayBoundary::Utc => Utc::now().date_naive(),
            DayBoundary::Local => Local::now().date_naive(),
        }
    }
}

/// Always reports the same day. Useful for backfills and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
