use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ledger::{
    count_in_window, occurrences_as_of, DateWindow, Recurrence, Transaction, TransactionType,
};

use super::filter_service::{FilterService, TransactionQuery};

/// Income and expense totals for one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    /// `net / income * 100`, or 0 without income.
    pub profit_margin: f64,
    pub occurrence_count: u32,
    pub record_count: usize,
    pub recurring_count: usize,
    /// Records in scope whose date could not be read; they contribute nothing.
    pub malformed_count: usize,
}

impl Summary {
    fn add(&mut self, kind: TransactionType, total: f64) {
        match kind {
            TransactionType::Income => self.income += total,
            TransactionType::Expense => self.expense += total,
        }
    }

    fn finish(mut self) -> Self {
        self.net = self.income - self.expense;
        self.profit_margin = profit_margin(self.income, self.net);
        self
    }
}

pub(crate) fn profit_margin(income: f64, net: f64) -> f64 {
    if income > 0.0 {
        net / income * 100.0
    } else {
        0.0
    }
}

/// Relevant records for a query together with their totals.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub window: Option<DateWindow>,
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
}

pub struct SummaryService;

impl SummaryService {
    /// Filters `transactions` by `query` and totals the result.
    ///
    /// One-off records count their amount once. Recurring records count
    /// `amount * occurrences` inside the window, never past `today`; all-time
    /// queries use the lifetime count instead. Unrecognized intervals count once.
    pub fn aggregate(
        transactions: &[Transaction],
        query: &TransactionQuery,
        today: NaiveDate,
    ) -> Aggregate {
        let filtered = FilterService::apply(transactions, query, today);
        let mut summary = Self::summarize(&filtered.transactions, filtered.window, today);
        summary.malformed_count = transactions
            .iter()
            .filter(|txn| FilterService::matches_scope(txn, query))
            .filter(|txn| txn.anchor_date().is_none())
            .inspect(|txn| warn!(id = %txn.id, date = %txn.date, "skipping transaction with malformed date"))
            .count();
        debug!(
            records = summary.record_count,
            income = summary.income,
            expense = summary.expense,
            "aggregated transactions"
        );
        Aggregate {
            window: filtered.window,
            transactions: filtered.transactions,
            summary,
        }
    }

    /// Totals already-filtered records. `window` is `None` for all-time totals.
    pub fn summarize(
        transactions: &[Transaction],
        window: Option<DateWindow>,
        today: NaiveDate,
    ) -> Summary {
        let mut summary = Summary::default();
        for txn in transactions {
            if txn.anchor_date().is_none() {
                continue;
            }
            let occurrences = match (txn.recurrence(), window) {
                (Recurrence::Every(_), Some(window)) => count_in_window(txn, window, today),
                (Recurrence::Every(_), None) => occurrences_as_of(txn, today).occurrences,
                (Recurrence::OneOff | Recurrence::Unrecognized(_), _) => 1,
            };
            if txn.is_recurring() {
                summary.recurring_count += 1;
            }
            summary.record_count += 1;
            summary.occurrence_count = summary.occurrence_count.saturating_add(occurrences);
            summary.add(txn.kind, txn.amount * f64::from(occurrences));
        }
        summary.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{DateFilter, MonthKey, RecurringInterval};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn february() -> TransactionQuery {
        TransactionQuery {
            date_filter: DateFilter::SpecificMonth(MonthKey::new(2024, 2).unwrap()),
            ..TransactionQuery::default()
        }
    }

    #[test]
    fn recurring_totals_are_bounded_by_window_and_today() {
        let property = Uuid::new_v4();
        let rent = Transaction::new(property, TransactionType::Income, 1000.0, date(2024, 1, 15))
            .with_interval(RecurringInterval::Weekly);
        let repair = Transaction::new(property, TransactionType::Expense, 500.0, date(2024, 2, 10));
        let today = date(2024, 3, 1);

        let aggregate = SummaryService::aggregate(&[rent, repair], &february(), today);
        assert_eq!(aggregate.transactions.len(), 2);
        assert_eq!(aggregate.summary.income, 4000.0);
        assert_eq!(aggregate.summary.expense, 500.0);
        assert_eq!(aggregate.summary.net, 3500.0);
        assert_eq!(aggregate.summary.profit_margin, 87.5);
        assert_eq!(aggregate.summary.occurrence_count, 5);
        assert_eq!(aggregate.summary.recurring_count, 1);
    }

    #[test]
    fn all_time_uses_lifetime_counts() {
        let rent = Transaction::new(Uuid::new_v4(), TransactionType::Income, 100.0, date(2024, 11, 20))
            .with_interval(RecurringInterval::Monthly);
        let query = TransactionQuery {
            date_filter: DateFilter::AllTime,
            ..TransactionQuery::default()
        };
        let aggregate = SummaryService::aggregate(&[rent], &query, date(2025, 1, 5));
        assert_eq!(aggregate.window, None);
        assert_eq!(aggregate.summary.income, 300.0);
        assert_eq!(aggregate.summary.occurrence_count, 3);
    }

    #[test]
    fn malformed_records_are_counted_not_totalled() {
        let mut broken = Transaction::new(Uuid::new_v4(), TransactionType::Income, 75.0, date(2024, 2, 1));
        broken.date = "31/02/2024".into();
        let aggregate = SummaryService::aggregate(&[broken], &february(), date(2024, 3, 1));
        assert!(aggregate.transactions.is_empty());
        assert_eq!(aggregate.summary.malformed_count, 1);
        assert_eq!(aggregate.summary.income, 0.0);
        assert_eq!(aggregate.summary.profit_margin, 0.0);
    }

    #[test]
    fn unrecognized_interval_counts_once() {
        let mut txn = Transaction::new(Uuid::new_v4(), TransactionType::Expense, 40.0, date(2024, 2, 3));
        txn.recurring_interval = Some("FORTNIGHTLY".into());
        let aggregate = SummaryService::aggregate(&[txn], &february(), date(2024, 3, 1));
        assert_eq!(aggregate.summary.expense, 40.0);
        assert_eq!(aggregate.summary.recurring_count, 0);
    }
}
