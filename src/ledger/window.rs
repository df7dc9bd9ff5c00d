use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::time_interval::{end_of_month, end_of_year, start_of_month, start_of_year};
use crate::errors::LedgerError;

/// Inclusive calendar range `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if end < start {
            return Err(LedgerError::InvalidInput(format!(
                "window end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn month_of(date: NaiveDate) -> Self {
        Self {
            start: start_of_month(date),
            end: end_of_month(date),
        }
    }

    pub fn year_of(date: NaiveDate) -> Self {
        Self {
            start: start_of_year(date),
            end: end_of_year(date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Narrows the window to `[max(start, from), min(end, until)]`; `None` when empty.
    pub fn clip(&self, from: NaiveDate, until: NaiveDate) -> Option<Self> {
        let start = self.start.max(from);
        let end = self.end.min(until);
        (start <= end).then_some(Self { start, end })
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A calendar month, always stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(MonthKey)
            .ok_or_else(|| LedgerError::InvalidInput(format!("{year}-{month:02} is not a month")))
    }

    pub fn of(date: NaiveDate) -> Self {
        MonthKey(start_of_month(date))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        end_of_month(self.0)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidInput(format!("`{s}` is not a YYYY-MM month"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month)
    }
}

/// Date-range selection of the financial views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    ThisMonth,
    ThisYear,
    AllTime,
    SpecificMonth(MonthKey),
    SpecificYear(i32),
    MonthRange { from: MonthKey, to: MonthKey },
}

impl DateFilter {
    /// Resolves the filter against `today`. `AllTime` has no window.
    pub fn window(&self, today: NaiveDate) -> Option<DateWindow> {
        match self {
            DateFilter::AllTime => None,
            DateFilter::ThisMonth => Some(DateWindow::month_of(today)),
            DateFilter::ThisYear => Some(DateWindow::year_of(today)),
            DateFilter::SpecificMonth(month) => Some(DateWindow {
                start: month.first_day(),
                end: month.last_day(),
            }),
            DateFilter::SpecificYear(year) => {
                NaiveDate::from_ymd_opt(*year, 1, 1).map(DateWindow::year_of)
            }
            DateFilter::MonthRange { from, to } => {
                let (first, last) = if from <= to { (from, to) } else { (to, from) };
                Some(DateWindow {
                    start: first.first_day(),
                    end: last.last_day(),
                })
            }
        }
    }

    pub fn is_all_time(&self) -> bool {
        matches!(self, DateFilter::AllTime)
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::ThisMonth => f.write_str("this-month"),
            DateFilter::ThisYear => f.write_str("this-year"),
            DateFilter::AllTime => f.write_str("all-time"),
            DateFilter::SpecificMonth(month) => write!(f, "{month}"),
            DateFilter::SpecificYear(year) => write!(f, "{year:04}"),
            DateFilter::MonthRange { from, to } => write!(f, "{from}..{to}"),
        }
    }
}

impl FromStr for DateFilter {
    type Err = LedgerError;

    /// Accepts `this-month`, `this-year`, `all-time` (underscores and any case also
    /// work), `YYYY-MM`, `YYYY`, and `YYYY-MM..YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().replace('_', "-").as_str() {
            "this-month" => return Ok(DateFilter::ThisMonth),
            "this-year" => return Ok(DateFilter::ThisYear),
            "all-time" => return Ok(DateFilter::AllTime),
            _ => {}
        }
        if let Some((from, to)) = value.split_once("..") {
            let from: MonthKey = from.parse()?;
            let to: MonthKey = to.parse()?;
            if to < from {
                return Err(LedgerError::InvalidInput(format!(
                    "month range `{value}` ends before it starts"
                )));
            }
            return Ok(DateFilter::MonthRange { from, to });
        }
        if value.contains('-') {
            return value.parse().map(DateFilter::SpecificMonth);
        }
        let year: i32 = value
            .parse()
            .map_err(|_| LedgerError::InvalidInput(format!("unknown period `{value}`")))?;
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(LedgerError::InvalidInput(format!("year {year} is out of range")));
        }
        Ok(DateFilter::SpecificYear(year))
    }
}
