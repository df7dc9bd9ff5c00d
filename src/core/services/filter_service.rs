//! Filtering, ordering, and paging of transaction snapshots.

use std::cmp::Reverse;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{occurs_in_range, DateFilter, DateWindow, Transaction, TransactionType};

use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn matches(&self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionType::Income,
            TypeFilter::Expense => kind == TransactionType::Expense,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "income" => Ok(TypeFilter::Income),
            "expense" => Ok(TypeFilter::Expense),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown transaction type `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyScope {
    #[default]
    AllProperties,
    Property(Uuid),
}

impl PropertyScope {
    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            PropertyScope::AllProperties => true,
            PropertyScope::Property(id) => txn.property_id == *id,
        }
    }
}

/// Narrows a single property's records by the unit they were booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitScope {
    #[default]
    AllTransactions,
    /// Records booked on the property itself (no unit).
    PropertyLevel,
    /// Records booked on any unit.
    AllUnits,
    Unit(Uuid),
}

impl UnitScope {
    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            UnitScope::AllTransactions => true,
            UnitScope::PropertyLevel => txn.unit_id.is_none(),
            UnitScope::AllUnits => txn.unit_id.is_some(),
            UnitScope::Unit(id) => txn.unit_id == Some(*id),
        }
    }
}

impl FromStr for UnitScope {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "all" | "all-transactions" => Ok(UnitScope::AllTransactions),
            "property-level" => Ok(UnitScope::PropertyLevel),
            "all-units" => Ok(UnitScope::AllUnits),
            other => Uuid::parse_str(other)
                .map(UnitScope::Unit)
                .map_err(|_| LedgerError::InvalidInput(format!("unknown unit scope `{s}`"))),
        }
    }
}

/// Filter selection of the financial views, passed in explicitly per query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub type_filter: TypeFilter,
    /// Only applied when `type_filter` picks a single type.
    pub category: Option<String>,
    pub search: Option<String>,
    pub property: PropertyScope,
    pub unit: UnitScope,
    pub date_filter: DateFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredTransactions {
    /// `None` for all-time queries.
    pub window: Option<DateWindow>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<'a, T> {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
}

pub struct FilterService;

impl FilterService {
    /// Type, category, search, property, and unit checks; no date logic.
    /// The unit scope only narrows a single-property selection.
    pub fn matches_scope(txn: &Transaction, query: &TransactionQuery) -> bool {
        if !query.type_filter.matches(txn.kind) {
            return false;
        }
        if query.type_filter != TypeFilter::All {
            if let Some(category) = query.category.as_deref() {
                if txn.category.as_deref() != Some(category) {
                    return false;
                }
            }
        }
        if let Some(term) = query.search.as_deref().filter(|term| !term.is_empty()) {
            if !matches_search(txn, &term.to_lowercase()) {
                return false;
            }
        }
        match query.property {
            PropertyScope::AllProperties => true,
            PropertyScope::Property(_) => query.property.matches(txn) && query.unit.matches(txn),
        }
    }

    /// A record is relevant to a window when its anchor falls inside it or, for
    /// recurring records, when any occurrence does. Without a window everything passes.
    pub fn matches_window(txn: &Transaction, window: Option<DateWindow>, today: NaiveDate) -> bool {
        let Some(window) = window else {
            return true;
        };
        let Some(anchor) = txn.anchor_date() else {
            return false;
        };
        window.contains(anchor) || occurs_in_range(txn, window, today)
    }

    /// Filters and orders a snapshot: anchor date descending, then creation time
    /// descending. Records with malformed dates sort last.
    pub fn apply(
        transactions: &[Transaction],
        query: &TransactionQuery,
        today: NaiveDate,
    ) -> FilteredTransactions {
        let window = query.date_filter.window(today);
        let mut matched: Vec<Transaction> = transactions
            .iter()
            .filter(|txn| Self::matches_scope(txn, query))
            .filter(|txn| Self::matches_window(txn, window, today))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        debug!(
            total = transactions.len(),
            matched = matched.len(),
            period = %query.date_filter,
            "filtered transactions"
        );
        FilteredTransactions {
            window,
            transactions: matched,
        }
    }

    /// Returns the 1-based `page`. Pages past the end are empty.
    pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> ServiceResult<Page<'_, T>> {
        if page == 0 {
            return Err(ServiceError::Invalid("pages are numbered from 1".into()));
        }
        if per_page == 0 {
            return Err(ServiceError::Invalid("page size must be at least 1".into()));
        }
        let total_pages = items.len().div_ceil(per_page).max(1);
        let start = (page - 1).saturating_mul(per_page).min(items.len());
        let end = start.saturating_add(per_page).min(items.len());
        Ok(Page {
            page,
            per_page,
            total_pages,
            total_items: items.len(),
            items: &items[start..end],
        })
    }
}

fn matches_search(txn: &Transaction, term: &str) -> bool {
    let haystacks = [
        Some(txn.description.as_str()),
        txn.property_title(),
        txn.category.as_deref(),
        txn.unit_label(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(term))
}

pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by_cached_key(|txn| (Reverse(txn.anchor_date()), Reverse(txn.created_at_millis())));
}

pub fn sort_oldest_first(transactions: &mut [Transaction]) {
    transactions.sort_by_cached_key(|txn| (txn.anchor_date().is_none(), txn.anchor_date()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn paginate_reports_bounds() {
        let items: Vec<u32> = (1..=23).collect();
        let page = FilterService::paginate(&items, 3, 10).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, &[21, 22, 23]);

        let beyond = FilterService::paginate(&items, 9, 10).unwrap();
        assert!(beyond.items.is_empty());

        let empty: Vec<u32> = Vec::new();
        assert_eq!(FilterService::paginate(&empty, 1, 10).unwrap().total_pages, 1);
        assert!(FilterService::paginate(&items, 0, 10).is_err());
        assert!(FilterService::paginate(&items, 1, 0).is_err());
    }

    #[test]
    fn category_only_applies_to_a_single_type() {
        let property = Uuid::new_v4();
        let rent = Transaction::new(property, TransactionType::Income, 100.0, date(2024, 1, 1))
            .with_category("RENT");
        let query = TransactionQuery {
            category: Some("DEPOSIT".into()),
            ..TransactionQuery::default()
        };
        assert!(FilterService::matches_scope(&rent, &query));

        let query = TransactionQuery {
            type_filter: TypeFilter::Income,
            ..query
        };
        assert!(!FilterService::matches_scope(&rent, &query));
    }

    #[test]
    fn unit_scopes() {
        let property = Uuid::new_v4();
        let unit = Uuid::new_v4();
        let on_property = Transaction::new(property, TransactionType::Expense, 10.0, date(2024, 1, 1));
        let on_unit = on_property.clone().with_unit(unit, "Unit 2B");

        assert!(UnitScope::PropertyLevel.matches(&on_property));
        assert!(!UnitScope::PropertyLevel.matches(&on_unit));
        assert!(UnitScope::AllUnits.matches(&on_unit));
        assert!(UnitScope::Unit(unit).matches(&on_unit));
        assert!(!UnitScope::Unit(Uuid::new_v4()).matches(&on_unit));
        assert_eq!("property_level".parse::<UnitScope>().unwrap(), UnitScope::PropertyLevel);
        assert_eq!(unit.to_string().parse::<UnitScope>().unwrap(), UnitScope::Unit(unit));
    }

    #[test]
    fn unit_scope_needs_a_property() {
        let property = Uuid::new_v4();
        let on_unit = Transaction::new(property, TransactionType::Expense, 10.0, date(2024, 1, 1))
            .with_unit(Uuid::new_v4(), "Unit 2B");
        let everywhere = TransactionQuery {
            unit: UnitScope::PropertyLevel,
            ..TransactionQuery::default()
        };
        assert!(FilterService::matches_scope(&on_unit, &everywhere));

        let one_property = TransactionQuery {
            property: PropertyScope::Property(property),
            ..everywhere
        };
        assert!(!FilterService::matches_scope(&on_unit, &one_property));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let txn = Transaction::new(Uuid::new_v4(), TransactionType::Expense, 10.0, date(2024, 1, 1))
            .with_description("Roof repair")
            .with_unit(Uuid::new_v4(), "Penthouse");
        let query = |term: &str| TransactionQuery {
            search: Some(term.into()),
            ..TransactionQuery::default()
        };
        assert!(FilterService::matches_scope(&txn, &query("ROOF")));
        assert!(FilterService::matches_scope(&txn, &query("penthouse")));
        assert!(!FilterService::matches_scope(&txn, &query("garden")));
    }
}
