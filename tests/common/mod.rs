#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rentease_ledger::ledger::{RecurringInterval, Transaction, TransactionType};
use rentease_ledger::utils::persistence::save_transactions_to_file;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const SUNRISE: &str = "8d6f2f7e-3c1a-4f3e-9c55-0a1b2c3d4e5f";
pub const HARBOR: &str = "1f0e2d3c-4b5a-4968-8776-a5b4c3d2e1f0";
pub const UNIT_2B: &str = "5a4b3c2d-1e0f-4a9b-8c7d-6e5f4a3b2c1d";

/// A fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).expect("valid uuid")
}

pub fn income(anchor: NaiveDate, amount: f64) -> Transaction {
    Transaction::new(id(SUNRISE), TransactionType::Income, amount, anchor)
}

pub fn expense(anchor: NaiveDate, amount: f64) -> Transaction {
    Transaction::new(id(SUNRISE), TransactionType::Expense, amount, anchor)
}

pub fn recurring(anchor: NaiveDate, amount: f64, interval: RecurringInterval) -> Transaction {
    income(anchor, amount).with_interval(interval)
}

/// Portfolio used by the aggregate and CLI tests, evaluated with today = 2024-03-01.
pub fn portfolio() -> Vec<Transaction> {
    let mut deposit = income(date(2024, 1, 5), 15000.0)
        .with_category("DEPOSIT")
        .with_description("Security deposit")
        .with_created_at("2024-01-05T09:00:00Z");
    deposit.property_id = id(HARBOR);

    let mut unreadable = expense(date(2024, 2, 1), 99.0).with_description("Imported row");
    unreadable.date = "2024-02-30".into();

    vec![
        recurring(date(2024, 1, 15), 1000.0, RecurringInterval::Weekly)
            .with_category("RENT")
            .with_description("Weekly parking rent")
            .with_created_at("2024-01-15T08:00:00Z"),
        expense(date(2024, 2, 10), 500.0)
            .with_category("REPAIRS")
            .with_description("Leaking roof")
            .with_unit(id(UNIT_2B), "Unit 2B")
            .with_created_at("2024-02-10T10:00:00Z"),
        expense(date(2024, 2, 10), 120.0)
            .with_category("UTILITIES")
            .with_description("Water bill")
            .with_created_at("2024-02-10T12:30:00Z"),
        recurring(date(2023, 12, 31), 25000.0, RecurringInterval::Monthly)
            .with_category("RENT")
            .with_description("Unit 2B lease")
            .with_unit(id(UNIT_2B), "Unit 2B")
            .with_created_at("2023-12-20T08:00:00Z"),
        deposit,
        unreadable,
    ]
}

/// Writes `transactions` as an API-style snapshot and returns its path.
pub fn write_snapshot(transactions: &[Transaction]) -> PathBuf {
    let path = temp_dir().join("transactions.json");
    save_transactions_to_file(transactions, &path).expect("write snapshot");
    path
}
