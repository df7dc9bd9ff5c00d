//! Chart series for the financial dashboard.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::ledger::time_interval::{month_index, year_month_from_index};
use crate::ledger::{occurrences_in, DateFilter, DateWindow, MonthKey, Transaction, TransactionType};

use super::filter_service::{FilterService, TransactionQuery};
use super::summary_service::profit_margin;

/// Years shown before the current one on the all-time chart.
const ALL_TIME_YEARS_BACK: i32 = 2;
/// Years shown after the current one on the all-time chart.
const ALL_TIME_YEARS_AHEAD: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    fn bucket_index(&self, range: DateWindow, date: NaiveDate) -> usize {
        let offset = match self {
            Granularity::Daily => (date - range.start).num_days(),
            Granularity::Monthly => i64::from(month_index(date) - month_index(range.start)),
            Granularity::Yearly => i64::from(date.year() - range.start.year()),
        };
        usize::try_from(offset).unwrap_or(0)
    }
}

/// Chart range and bucket size for a date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineRange {
    pub granularity: Granularity,
    pub window: DateWindow,
}

impl TimelineRange {
    pub fn for_filter(filter: &DateFilter, today: NaiveDate) -> Self {
        match filter.window(today) {
            None => {
                let first = NaiveDate::from_ymd_opt(today.year() - ALL_TIME_YEARS_BACK, 1, 1);
                let last = NaiveDate::from_ymd_opt(today.year() + ALL_TIME_YEARS_AHEAD, 12, 31);
                let window = match (first, last) {
                    (Some(start), Some(end)) => DateWindow { start, end },
                    _ => DateWindow::year_of(today),
                };
                Self {
                    granularity: Granularity::Yearly,
                    window,
                }
            }
            Some(window) => {
                let granularity = match filter {
                    DateFilter::SpecificYear(_) => Granularity::Monthly,
                    _ => Granularity::Daily,
                };
                Self {
                    granularity,
                    window,
                }
            }
        }
    }

    /// Zero-filled buckets covering the range, ascending.
    fn empty_buckets(&self) -> Vec<TimelineBucket> {
        let window = self.window;
        match self.granularity {
            Granularity::Daily => window
                .days()
                .map(|day| TimelineBucket::empty(day.to_string(), day, day))
                .collect(),
            Granularity::Monthly => (month_index(window.start)..=month_index(window.end))
                .filter_map(|index| {
                    let (year, month) = year_month_from_index(index);
                    let key = MonthKey::new(year, month).ok()?;
                    Some(TimelineBucket::empty(
                        key.to_string(),
                        key.first_day().max(window.start),
                        key.last_day().min(window.end),
                    ))
                })
                .collect(),
            Granularity::Yearly => (window.start.year()..=window.end.year())
                .filter_map(|year| {
                    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
                    let year_window = DateWindow::year_of(start);
                    Some(TimelineBucket::empty(
                        year.to_string(),
                        year_window.start.max(window.start),
                        year_window.end.min(window.end),
                    ))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

impl TimelineBucket {
    fn empty(label: String, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label,
            start,
            end,
            income: 0.0,
            expense: 0.0,
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub granularity: Granularity,
    pub window: DateWindow,
    pub buckets: Vec<TimelineBucket>,
    pub income: f64,
    pub expense: f64,
    pub occurrence_count: u32,
    pub net_profit: f64,
    pub profit_margin: f64,
}

pub struct TimelineService;

impl TimelineService {
    /// Spreads every occurrence of the in-scope records over the chart buckets.
    /// Only the non-date parts of `query` narrow the records.
    pub fn build(transactions: &[Transaction], query: &TransactionQuery, today: NaiveDate) -> Timeline {
        let range = TimelineRange::for_filter(&query.date_filter, today);
        let mut buckets = range.empty_buckets();
        let mut income = 0.0;
        let mut expense = 0.0;
        let mut occurrence_count: u32 = 0;

        for txn in transactions
            .iter()
            .filter(|txn| FilterService::matches_scope(txn, query))
        {
            for day in occurrences_in(txn, range.window, today) {
                let Some(bucket) = buckets.get_mut(range.granularity.bucket_index(range.window, day))
                else {
                    continue;
                };
                match txn.kind {
                    TransactionType::Income => {
                        bucket.income += txn.amount;
                        income += txn.amount;
                    }
                    TransactionType::Expense => {
                        bucket.expense += txn.amount;
                        expense += txn.amount;
                    }
                }
                occurrence_count = occurrence_count.saturating_add(1);
            }
        }

        debug!(
            buckets = buckets.len(),
            occurrences = occurrence_count,
            "built timeline"
        );
        let net_profit = income - expense;
        Timeline {
            granularity: range.granularity,
            window: range.window,
            buckets,
            income,
            expense,
            occurrence_count,
            net_profit,
            profit_margin: profit_margin(income, net_profit),
        }
    }
}
