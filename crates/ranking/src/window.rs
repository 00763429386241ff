//! Calendar windows and the days they span.
//!
//! All enumeration goes through chrono's calendar arithmetic. Weeks start on
//! Monday (ISO 8601). Week and month windows always cover the whole period,
//! including days that have not happened yet; their partitions simply do not
//! exist and contribute nothing to a union.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{RankingError, Result};
use crate::keys::DAY_KEY_FORMAT;

pub const CURRENT_WEEK_LABEL: &str = "rank:current_week";
pub const CURRENT_MONTH_LABEL: &str = "rank:current_month";

/// Label of the trailing-window union, e.g. `rank:last_7Days`.
pub fn last_days_label(n: u32) -> String {
    format!("rank:last_{n}Days")
}

/// The single day before `today`.
pub fn dates_for_yesterday(today: NaiveDate) -> Result<Vec<NaiveDate>> {
    let yesterday = today
        .pred_opt()
        .ok_or_else(|| RankingError::invalid(format!("no day before {today}")))?;
    Ok(vec![yesterday])
}

/// `n` days ending at `today` inclusive, oldest first.
pub fn dates_for_last_n_days(today: NaiveDate, n: u32) -> Result<Vec<NaiveDate>> {
    if n == 0 {
        return Err(RankingError::invalid("window must span at least one day"));
    }

    let first = today
        .checked_sub_days(Days::new(u64::from(n - 1)))
        .ok_or_else(|| {
            RankingError::invalid(format!("{n} days before {today} is out of range"))
        })?;

    Ok(first.iter_days().take(n as usize).collect())
}

/// Monday through Sunday of the week containing `today`.
pub fn dates_for_current_week(today: NaiveDate) -> Result<Vec<NaiveDate>> {
    let since_monday = u64::from(today.weekday().num_days_from_monday());
    let monday = today
        .checked_sub_days(Days::new(since_monday))
        .ok_or_else(|| {
            RankingError::invalid(format!("start of week for {today} is out of range"))
        })?;

    let week: Vec<NaiveDate> = monday.iter_days().take(7).collect();
    if week.len() != 7 {
        return Err(RankingError::invalid(format!(
            "end of week for {today} is out of range"
        )));
    }
    Ok(week)
}

/// Every day of the month containing `today`, from the 1st to the last.
///
/// Each date is built from (year, month, day) and the run stops at the first
/// day that does not exist, so month lengths and leap years come from chrono.
pub fn dates_for_current_month(today: NaiveDate) -> Vec<NaiveDate> {
    let (year, month) = (today.year(), today.month());
    (1..=31)
        .map_while(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// A named span of days that can be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Today,
    Yesterday,
    Day(NaiveDate),
    /// Trailing `n` days ending today.
    LastDays(u32),
    CurrentWeek,
    CurrentMonth,
}

impl Window {
    /// Days covered by this window, relative to `today`.
    pub fn dates(&self, today: NaiveDate) -> Result<Vec<NaiveDate>> {
        match *self {
            Window::Today => Ok(vec![today]),
            Window::Yesterday => dates_for_yesterday(today),
            Window::Day(date) => Ok(vec![date]),
            Window::LastDays(n) => dates_for_last_n_days(today, n),
            Window::CurrentWeek => dates_for_current_week(today),
            Window::CurrentMonth => Ok(dates_for_current_month(today)),
        }
    }

    /// Label of the derived union set, or `None` when the window is a single
    /// partition that is read directly.
    pub fn derived_label(&self) -> Option<Cow<'static, str>> {
        match *self {
            Window::Today | Window::Yesterday | Window::Day(_) => None,
            Window::LastDays(n) => Some(Cow::Owned(last_days_label(n))),
            Window::CurrentWeek => Some(Cow::Borrowed(CURRENT_WEEK_LABEL)),
            Window::CurrentMonth => Some(Cow::Borrowed(CURRENT_MONTH_LABEL)),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Today => f.write_str("today"),
            Window::Yesterday => f.write_str("yesterday"),
            Window::Day(date) => write!(f, "{}", date.format(DAY_KEY_FORMAT)),
            Window::LastDays(n) => write!(f, "{n}d"),
            Window::CurrentWeek => f.write_str("week"),
            Window::CurrentMonth => f.write_str("month"),
        }
    }
}

impl FromStr for Window {
    type Err = RankingError;

    /// Accepts `today`, `yesterday`, `week`, `month`, `<n>d`, `YYYYMMDD` and
    /// `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "today" => return Ok(Window::Today),
            "yesterday" => return Ok(Window::Yesterday),
            "week" => return Ok(Window::CurrentWeek),
            "month" => return Ok(Window::CurrentMonth),
            _ => {}
        }

        if let Some(n) = s.strip_suffix(['d', 'D'])
            && let Ok(n) = n.parse::<u32>()
        {
            if n == 0 {
                return Err(RankingError::invalid("window must span at least one day"));
            }
            return Ok(Window::LastDays(n));
        }

        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .map(Window::Day)
            .map_err(|_| RankingError::invalid(format!("unrecognised window: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::format_day;
    use crate::test_utils::date;

    fn formatted(dates: &[NaiveDate]) -> Vec<String> {
        dates.iter().map(|d| format_day(*d)).collect()
    }

    mod enumeration {
        use super::*;

        #[test]
        fn yesterday_crosses_year_boundary() {
            let dates = dates_for_yesterday(date(2024, 1, 1)).unwrap();
            assert_eq!(formatted(&dates), vec!["20231231"]);
        }

        #[test]
        fn last_one_day_is_today() {
            let dates = dates_for_last_n_days(date(2024, 3, 1), 1).unwrap();
            assert_eq!(formatted(&dates), vec!["20240301"]);
        }

        #[test]
        fn last_n_days_is_oldest_first_and_ends_today() {
            let dates = dates_for_last_n_days(date(2024, 3, 2), 4).unwrap();
            assert_eq!(
                formatted(&dates),
                vec!["20240228", "20240229", "20240301", "20240302"]
            );
        }

        #[test]
        fn last_thirty_days_has_thirty_consecutive_days() {
            let dates = dates_for_last_n_days(date(2024, 3, 15), 30).unwrap();

            assert_eq!(dates.len(), 30);
            assert_eq!(dates.last(), Some(&date(2024, 3, 15)));
            assert_eq!(dates.first(), Some(&date(2024, 2, 15)));
            assert!(dates.windows(2).all(|w| w[0].succ_opt() == Some(w[1])));
        }

        #[test]
        fn last_zero_days_is_rejected() {
            let err = dates_for_last_n_days(date(2024, 3, 1), 0).unwrap_err();
            assert!(err.is_invalid_argument());
        }

        #[test]
        fn week_starts_on_monday() {
            // 2024-03-06 is a Wednesday.
            let dates = dates_for_current_week(date(2024, 3, 6)).unwrap();
            assert_eq!(
                formatted(&dates),
                vec![
                    "20240304", "20240305", "20240306", "20240307", "20240308", "20240309",
                    "20240310"
                ]
            );
        }

        #[test]
        fn week_on_monday_and_sunday_is_same_week() {
            let monday = dates_for_current_week(date(2024, 3, 4)).unwrap();
            let sunday = dates_for_current_week(date(2024, 3, 10)).unwrap();
            assert_eq!(monday, sunday);
        }

        #[test]
        fn week_crosses_month_boundary() {
            // 2024-04-30 is a Tuesday.
            let dates = dates_for_current_week(date(2024, 4, 30)).unwrap();
            assert_eq!(
                formatted(&dates),
                vec![
                    "20240429", "20240430", "20240501", "20240502", "20240503", "20240504",
                    "20240505"
                ]
            );
        }

        #[test]
        fn week_crosses_year_boundary() {
            // 2024-12-31 is a Tuesday.
            let dates = dates_for_current_week(date(2024, 12, 31)).unwrap();
            assert_eq!(dates.first(), Some(&date(2024, 12, 30)));
            assert_eq!(dates.last(), Some(&date(2025, 1, 5)));
        }

        #[test]
        fn month_includes_future_days() {
            let dates = dates_for_current_month(date(2024, 4, 3));

            assert_eq!(dates.len(), 30);
            assert_eq!(dates.first(), Some(&date(2024, 4, 1)));
            assert_eq!(dates.last(), Some(&date(2024, 4, 30)));
        }

        #[test]
        fn month_length_follows_calendar() {
            assert_eq!(dates_for_current_month(date(2024, 2, 10)).len(), 29);
            assert_eq!(dates_for_current_month(date(2023, 2, 10)).len(), 28);
            assert_eq!(dates_for_current_month(date(2100, 2, 1)).len(), 28);
            assert_eq!(dates_for_current_month(date(2000, 2, 1)).len(), 29);
            assert_eq!(dates_for_current_month(date(2024, 1, 31)).len(), 31);
            assert_eq!(dates_for_current_month(date(2024, 11, 30)).len(), 30);
        }

        #[test]
        fn month_on_last_day_stays_in_month() {
            let dates = dates_for_current_month(date(2024, 1, 31));
            assert!(dates.iter().all(|d| d.month() == 1));
        }
    }

    mod windows {
        use super::*;

        #[test]
        fn single_day_windows_have_no_derived_label() {
            assert_eq!(Window::Today.derived_label(), None);
            assert_eq!(Window::Yesterday.derived_label(), None);
            assert_eq!(Window::Day(date(2024, 1, 1)).derived_label(), None);
        }

        #[test]
        fn derived_labels_match_key_scheme() {
            assert_eq!(
                Window::CurrentWeek.derived_label().as_deref(),
                Some("rank:current_week")
            );
            assert_eq!(
                Window::CurrentMonth.derived_label().as_deref(),
                Some("rank:current_month")
            );
            assert_eq!(
                Window::LastDays(7).derived_label().as_deref(),
                Some("rank:last_7Days")
            );
            assert_eq!(
                Window::LastDays(30).derived_label().as_deref(),
                Some("rank:last_30Days")
            );
        }

        #[test]
        fn today_window_is_today() {
            let today = date(2024, 3, 1);
            assert_eq!(Window::Today.dates(today).unwrap(), vec![today]);
        }

        #[test]
        fn parses_named_windows() {
            assert_eq!("today".parse::<Window>().unwrap(), Window::Today);
            assert_eq!("Yesterday".parse::<Window>().unwrap(), Window::Yesterday);
            assert_eq!("week".parse::<Window>().unwrap(), Window::CurrentWeek);
            assert_eq!("month".parse::<Window>().unwrap(), Window::CurrentMonth);
            assert_eq!("7d".parse::<Window>().unwrap(), Window::LastDays(7));
            assert_eq!("30D".parse::<Window>().unwrap(), Window::LastDays(30));
        }

        #[test]
        fn parses_explicit_days() {
            let expected = Window::Day(date(2024, 3, 1));
            assert_eq!("20240301".parse::<Window>().unwrap(), expected);
            assert_eq!("2024-03-01".parse::<Window>().unwrap(), expected);
        }

        #[test]
        fn rejects_zero_day_window() {
            assert!("0d".parse::<Window>().unwrap_err().is_invalid_argument());
        }

        #[test]
        fn rejects_unknown_window() {
            assert!("fortnight".parse::<Window>().unwrap_err().is_invalid_argument());
            assert!("20240230".parse::<Window>().is_err());
        }

        #[test]
        fn display_round_trips() {
            for window in [
                Window::Today,
                Window::Yesterday,
                Window::Day(date(2024, 3, 1)),
                Window::LastDays(7),
                Window::CurrentWeek,
                Window::CurrentMonth,
            ] {
                assert_eq!(window.to_string().parse::<Window>().unwrap(), window);
            }
        }
    }
}
