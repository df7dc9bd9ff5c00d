mod common;

use common::{date, id, portfolio, HARBOR, SUNRISE, UNIT_2B};
use rentease_ledger::core::services::{
    FilterService, PropertyScope, SummaryService, TransactionQuery, TypeFilter, UnitScope,
};
use rentease_ledger::ledger::{DateFilter, MonthKey};

fn february() -> DateFilter {
    DateFilter::SpecificMonth(MonthKey::new(2024, 2).unwrap())
}

fn query(date_filter: DateFilter) -> TransactionQuery {
    TransactionQuery {
        date_filter,
        ..TransactionQuery::default()
    }
}

#[test]
fn february_aggregate_counts_bounded_occurrences() {
    let aggregate = SummaryService::aggregate(&portfolio(), &query(february()), date(2024, 3, 1));

    let descriptions: Vec<_> = aggregate
        .transactions
        .iter()
        .map(|txn| txn.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["Water bill", "Leaking roof", "Weekly parking rent"]);

    let summary = aggregate.summary;
    assert_eq!(summary.income, 4000.0);
    assert_eq!(summary.expense, 620.0);
    assert_eq!(summary.net, 3380.0);
    assert_eq!(summary.profit_margin, 84.5);
    assert_eq!(summary.occurrence_count, 6);
    assert_eq!(summary.record_count, 3);
    assert_eq!(summary.malformed_count, 1);
}

#[test]
fn this_year_includes_month_end_lease_once() {
    let aggregate =
        SummaryService::aggregate(&portfolio(), &query(DateFilter::ThisYear), date(2024, 3, 1));
    assert_eq!(aggregate.summary.income, 7000.0 + 25000.0 + 15000.0);
    assert_eq!(aggregate.summary.expense, 620.0);
}

#[test]
fn all_time_uses_lifetime_counts_and_keeps_malformed_last() {
    let aggregate =
        SummaryService::aggregate(&portfolio(), &query(DateFilter::AllTime), date(2024, 3, 1));
    assert_eq!(aggregate.window, None);
    assert_eq!(aggregate.transactions.len(), 6);
    assert_eq!(
        aggregate.transactions.last().map(|txn| txn.date.as_str()),
        Some("2024-02-30")
    );
    // weekly 7 x 1000, monthly 4 x 25000, deposit 15000
    assert_eq!(aggregate.summary.income, 122000.0);
    assert_eq!(aggregate.summary.record_count, 5);
}

#[test]
fn scopes_narrow_the_selection() {
    let today = date(2024, 3, 1);
    let records = portfolio();

    let property_level = TransactionQuery {
        property: PropertyScope::Property(id(SUNRISE)),
        unit: UnitScope::PropertyLevel,
        ..query(february())
    };
    assert_eq!(FilterService::apply(&records, &property_level, today).transactions.len(), 2);

    let unit = TransactionQuery {
        property: PropertyScope::Property(id(SUNRISE)),
        unit: UnitScope::Unit(id(UNIT_2B)),
        ..query(DateFilter::ThisYear)
    };
    let unit_aggregate = SummaryService::aggregate(&records, &unit, today);
    assert_eq!(unit_aggregate.summary.income, 25000.0);
    assert_eq!(unit_aggregate.summary.expense, 500.0);

    let unit_without_property = TransactionQuery {
        unit: UnitScope::AllUnits,
        ..query(february())
    };
    assert_eq!(
        FilterService::apply(&records, &unit_without_property, today).transactions.len(),
        3
    );

    let harbor = TransactionQuery {
        property: PropertyScope::Property(id(HARBOR)),
        ..query(DateFilter::ThisYear)
    };
    let harbor_aggregate = SummaryService::aggregate(&records, &harbor, today);
    assert_eq!(harbor_aggregate.transactions.len(), 1);
    assert_eq!(harbor_aggregate.summary.income, 15000.0);

    let rent_only = TransactionQuery {
        type_filter: TypeFilter::Income,
        category: Some("RENT".into()),
        ..query(DateFilter::ThisYear)
    };
    assert_eq!(SummaryService::aggregate(&records, &rent_only, today).summary.income, 32000.0);
}

#[test]
fn pages_slice_the_sorted_list() {
    let filtered = FilterService::apply(&portfolio(), &query(DateFilter::AllTime), date(2024, 3, 1));
    let page = FilterService::paginate(&filtered.transactions, 2, 4).unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
}
