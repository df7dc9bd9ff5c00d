//! Occurrence arithmetic for recurring transactions.
//!
//! Every function here is a pure function of its arguments. `today` is always
//! passed in so a single query sees one consistent day boundary.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::time_interval::{month_index, whole_months_between, year_month_from_index, RecurringInterval};
use super::transaction::{Recurrence, Transaction};
use super::window::DateWindow;

/// Months searched for one that has the anchor's day, counting the starting month.
/// A day-31 anchor can miss the starting month and the next one.
const MAX_MONTHS_AHEAD: i32 = 3;

/// Years searched for the anchor's month and day, counting the starting year.
/// Feb 29 can be eight years away when a century year is skipped (2096 to 2104),
/// and the starting year itself may already be past.
const MAX_YEARS_AHEAD: i32 = 9;

/// Lifetime occurrence count and the amount it adds up to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OccurrenceTally {
    pub occurrences: u32,
    pub total_amount: f64,
}

impl OccurrenceTally {
    pub const NONE: OccurrenceTally = OccurrenceTally {
        occurrences: 0,
        total_amount: 0.0,
    };

    fn of(amount: f64, occurrences: u32) -> Self {
        Self {
            occurrences,
            total_amount: amount * f64::from(occurrences),
        }
    }
}

/// Whether `txn` has an occurrence on `target`.
///
/// Nothing occurs before the anchor or after `today`. Monthly and yearly rules match
/// the anchor's day of month exactly, so a day-31 anchor has no occurrence in a
/// 30-day month and a Feb 29 anchor only recurs in leap years.
pub fn occurs_on(txn: &Transaction, target: NaiveDate, today: NaiveDate) -> bool {
    let Some(anchor) = txn.anchor_date() else {
        return false;
    };
    if target < anchor || target > today {
        return false;
    }
    match txn.recurrence() {
        Recurrence::OneOff => target == anchor,
        Recurrence::Every(interval) => lands_on(anchor, interval, target),
        Recurrence::Unrecognized(_) => false,
    }
}

fn lands_on(anchor: NaiveDate, interval: RecurringInterval, target: NaiveDate) -> bool {
    let diff_days = (target - anchor).num_days();
    match interval {
        RecurringInterval::Daily => diff_days >= 0,
        RecurringInterval::Weekly => diff_days >= 0 && diff_days % 7 == 0,
        RecurringInterval::Monthly => {
            whole_months_between(anchor, target) >= 0 && target.day() == anchor.day()
        }
        RecurringInterval::Yearly => {
            target.year() >= anchor.year()
                && target.month() == anchor.month()
                && target.day() == anchor.day()
        }
    }
}

/// Earliest date on or after `from` (and the anchor) that `interval` lands on.
pub fn first_on_or_after(
    anchor: NaiveDate,
    interval: RecurringInterval,
    from: NaiveDate,
) -> Option<NaiveDate> {
    let from = from.max(anchor);
    match interval {
        RecurringInterval::Daily => Some(from),
        RecurringInterval::Weekly => {
            let weeks = ((from - anchor).num_days() + 6) / 7;
            anchor.checked_add_signed(Duration::weeks(weeks))
        }
        RecurringInterval::Monthly => {
            let first_month = month_index(from);
            (0..MAX_MONTHS_AHEAD).find_map(|step| {
                let (year, month) = year_month_from_index(first_month + step);
                NaiveDate::from_ymd_opt(year, month, anchor.day()).filter(|date| *date >= from)
            })
        }
        RecurringInterval::Yearly => (0..MAX_YEARS_AHEAD).find_map(|step| {
            NaiveDate::from_ymd_opt(from.year() + step, anchor.month(), anchor.day())
                .filter(|date| *date >= from)
        }),
    }
}

/// Ascending occurrence dates of one transaction inside a window.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDate,
    interval: Option<RecurringInterval>,
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Occurrences {
    fn empty(window: DateWindow) -> Self {
        Self {
            anchor: window.start,
            interval: None,
            next: None,
            end: window.end,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|date| *date <= self.end)?;
        self.next = self.interval.and_then(|interval| {
            current
                .succ_opt()
                .and_then(|from| first_on_or_after(self.anchor, interval, from))
        });
        Some(current)
    }
}

/// Occurrences of `txn` within `window`, clipped to `[anchor, today]`.
///
/// Yields exactly the dates `d` in the window for which [`occurs_on`] holds.
pub fn occurrences_in(txn: &Transaction, window: DateWindow, today: NaiveDate) -> Occurrences {
    let Some(anchor) = txn.anchor_date() else {
        return Occurrences::empty(window);
    };
    let Some(bounds) = window.clip(anchor, today) else {
        return Occurrences::empty(window);
    };
    match txn.recurrence() {
        Recurrence::OneOff => Occurrences {
            anchor,
            interval: None,
            next: bounds.contains(anchor).then_some(anchor),
            end: bounds.end,
        },
        Recurrence::Every(interval) => Occurrences {
            anchor,
            interval: Some(interval),
            next: first_on_or_after(anchor, interval, bounds.start),
            end: bounds.end,
        },
        Recurrence::Unrecognized(_) => Occurrences::empty(window),
    }
}

/// Whether a recurring transaction occurs at least once in `window`.
///
/// One-off records always answer `false`; test their anchor against the window instead.
pub fn occurs_in_range(txn: &Transaction, window: DateWindow, today: NaiveDate) -> bool {
    txn.is_recurring() && occurrences_in(txn, window, today).next().is_some()
}

/// Number of occurrences inside `window`, never counting days after `today`.
pub fn count_in_window(txn: &Transaction, window: DateWindow, today: NaiveDate) -> u32 {
    let count = occurrences_in(txn, window, today).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Lifetime occurrences from the anchor through `today`.
///
/// The counts follow the dashboard's established numbers:
/// - an anchor after `today` still counts once;
/// - monthly counts whole calendar months and yearly counts calendar years, without
///   checking whether the anchor's day has been reached in the current period;
/// - one-off and unrecognized intervals count once;
/// - a malformed anchor counts zero.
pub fn occurrences_as_of(txn: &Transaction, today: NaiveDate) -> OccurrenceTally {
    let Some(anchor) = txn.anchor_date() else {
        return OccurrenceTally::NONE;
    };
    let Recurrence::Every(interval) = txn.recurrence() else {
        return OccurrenceTally::of(txn.amount, 1);
    };
    if today < anchor {
        return OccurrenceTally::of(txn.amount, 1);
    }
    let elapsed_days = (today - anchor).num_days();
    let occurrences = match interval {
        RecurringInterval::Daily => elapsed_days + 1,
        RecurringInterval::Weekly => elapsed_days / 7 + 1,
        RecurringInterval::Monthly => i64::from(whole_months_between(anchor, today)) + 1,
        RecurringInterval::Yearly => i64::from(today.year() - anchor.year()) + 1,
    };
    OccurrenceTally::of(txn.amount, u32::try_from(occurrences).unwrap_or(u32::MAX))
}
