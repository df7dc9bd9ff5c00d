use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ledger::{
    category_label, occurrences_as_of, DateFilter, DateWindow, Transaction, TransactionType,
};

use super::filter_service::{sort_oldest_first, FilterService, PropertyScope, TransactionQuery};
use super::summary_service::profit_margin;

/// Selection behind an itemized export.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportRequest {
    pub property: PropertyScope,
    pub date_filter: DateFilter,
}

/// One itemized line. `total` is the unit amount times the lifetime occurrence
/// count as of the report date, independent of the selected window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub property: Option<String>,
    pub unit: Option<String>,
    pub kind: TransactionType,
    pub category: String,
    pub recurrence: String,
    pub amount: f64,
    pub occurrences: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_on: NaiveDate,
    pub window: Option<DateWindow>,
    pub rows: Vec<ReportRow>,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub profit_margin: f64,
    pub record_count: usize,
}

pub struct ReportService;

impl ReportService {
    pub fn build(transactions: &[Transaction], request: &ReportRequest, today: NaiveDate) -> Report {
        let query = TransactionQuery {
            property: request.property,
            date_filter: request.date_filter,
            ..TransactionQuery::default()
        };
        let mut selected = FilterService::apply(transactions, &query, today);
        sort_oldest_first(&mut selected.transactions);

        let rows: Vec<ReportRow> = selected
            .transactions
            .iter()
            .filter_map(|txn| {
                let row = Self::row(txn, today);
                if row.is_none() {
                    warn!(id = %txn.id, date = %txn.date, "leaving malformed transaction out of report");
                }
                row
            })
            .collect();

        let (income, expense) = rows.iter().fold((0.0, 0.0), |(income, expense), row| match row.kind {
            TransactionType::Income => (income + row.total, expense),
            TransactionType::Expense => (income, expense + row.total),
        });
        let net = income - expense;
        debug!(rows = rows.len(), "built report");
        Report {
            generated_on: today,
            window: selected.window,
            record_count: rows.len(),
            rows,
            income,
            expense,
            net,
            profit_margin: profit_margin(income, net),
        }
    }

    fn row(txn: &Transaction, today: NaiveDate) -> Option<ReportRow> {
        let date = txn.anchor_date()?;
        let tally = occurrences_as_of(txn, today);
        Some(ReportRow {
            id: txn.id,
            date,
            description: txn.description.clone(),
            property: txn.property_title().map(str::to_string),
            unit: txn.unit_label().map(str::to_string),
            kind: txn.kind,
            category: category_label(txn.category.as_deref()),
            recurrence: txn.recurrence().label(),
            amount: txn.amount,
            occurrences: tally.occurrences,
            total: tally.total_amount,
        })
    }
}
