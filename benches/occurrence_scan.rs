use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rentease_ledger::core::services::{SummaryService, TimelineService, TransactionQuery};
use rentease_ledger::ledger::{
    occurs_on, DateFilter, DateWindow, RecurringInterval, Transaction, TransactionType,
};
use uuid::Uuid;

fn build_snapshot(txn_count: usize) -> Vec<Transaction> {
    let property = Uuid::new_v4();
    let start_date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();

    (0..txn_count)
        .map(|idx| {
            let anchor = start_date + Duration::days((idx % 3650) as i64);
            let kind = if idx % 4 == 0 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            };
            let txn = Transaction::new(property, kind, 100.0 + (idx % 50) as f64, anchor);
            match idx % 5 {
                0 => txn,
                n => txn.with_interval(RecurringInterval::ALL[n - 1]),
            }
        })
        .collect()
}

fn bench_range_queries(c: &mut Criterion) {
    let snapshot = build_snapshot(black_box(5_000));
    let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let year = DateWindow::year_of(today);

    c.bench_function("day_by_day_scan_1y_5k", |b| {
        b.iter(|| {
            let hits = snapshot
                .iter()
                .filter(|txn| year.days().any(|day| occurs_on(txn, day, today)))
                .count();
            black_box(hits);
        })
    });

    let query = TransactionQuery {
        date_filter: DateFilter::ThisYear,
        ..TransactionQuery::default()
    };
    c.bench_function("aggregate_this_year_5k", |b| {
        b.iter(|| black_box(SummaryService::aggregate(&snapshot, &query, today)))
    });

    let all_time = TransactionQuery {
        date_filter: DateFilter::AllTime,
        ..TransactionQuery::default()
    };
    c.bench_function("timeline_all_time_5k", |b| {
        b.iter(|| black_box(TimelineService::build(&snapshot, &all_time, today)))
    });
}

criterion_group!(benches, bench_range_queries);
criterion_main!(benches);
