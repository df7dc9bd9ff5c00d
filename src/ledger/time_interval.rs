use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Cadence a recurring transaction repeats on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringInterval {
    pub const ALL: [RecurringInterval; 4] = [
        RecurringInterval::Daily,
        RecurringInterval::Weekly,
        RecurringInterval::Monthly,
        RecurringInterval::Yearly,
    ];

    /// Parses the wire tag (`DAILY`, `WEEKLY`, ...). Matching ignores case and
    /// surrounding whitespace; `NONE` is not an interval and yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(RecurringInterval::Daily),
            "WEEKLY" => Some(RecurringInterval::Weekly),
            "MONTHLY" => Some(RecurringInterval::Monthly),
            "YEARLY" => Some(RecurringInterval::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "DAILY",
            RecurringInterval::Weekly => "WEEKLY",
            RecurringInterval::Monthly => "MONTHLY",
            RecurringInterval::Yearly => "YEARLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Zero-based month counter (`year * 12 + month - 1`), handy for month differences.
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    month_index(to) - month_index(from)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// First day of the month `date` falls in.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last day of the month `date` falls in.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let remaining = days_in_month(date.year(), date.month()) - date.day();
    date + Duration::days(i64::from(remaining))
}

/// January 1st of the year `date` falls in.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

/// December 31st of the year `date` falls in.
pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    let days_in_year = if date.leap_year() { 366 } else { 365 };
    date + Duration::days(i64::from(days_in_year - date.ordinal()))
}

/// Splits a zero-based month index back into `(year, month)`.
pub fn year_month_from_index(index: i32) -> (i32, u32) {
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
