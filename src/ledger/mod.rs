//! Transaction records, date windows, and the recurrence engine.

pub mod category;
pub mod recurring;
pub mod time_interval;
pub mod transaction;
pub mod window;

pub use category::{category_label, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use recurring::{
    count_in_window, occurrences_as_of, occurrences_in, occurs_in_range, occurs_on,
    OccurrenceTally, Occurrences,
};
pub use time_interval::RecurringInterval;
pub use transaction::{
    DataIssue, PropertyRef, Recurrence, Transaction, TransactionType, UnitRef,
};
pub use window::{DateFilter, DateWindow, MonthKey};
