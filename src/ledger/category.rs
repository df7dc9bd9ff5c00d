use super::transaction::TransactionType;

/// Category tags the backend accepts for income records.
pub const INCOME_CATEGORIES: [&str; 4] = ["RENT", "LATE_FEE", "DEPOSIT", "OTHER_INCOME"];

/// Category tags the backend accepts for expense records.
pub const EXPENSE_CATEGORIES: [&str; 8] = [
    "MAINTENANCE",
    "REPAIRS",
    "UTILITIES",
    "INSURANCE",
    "TAXES",
    "PROPERTY_MANAGEMENT",
    "LISTING_ADVERTISING",
    "OTHER_EXPENSE",
];

/// Known categories for a transaction type.
pub fn categories_for(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

pub fn is_known_category(kind: TransactionType, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

/// Turns `PROPERTY_MANAGEMENT` into `Property Management`; missing categories read `N/A`.
pub fn category_label(category: Option<&str>) -> String {
    let Some(raw) = category.filter(|value| !value.is_empty()) else {
        return "N/A".into();
    };
    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest: String = chars.collect();
                    format!("{}{}", first, rest.to_lowercase())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_title_case_each_word() {
        assert_eq!(category_label(Some("PROPERTY_MANAGEMENT")), "Property Management");
        assert_eq!(category_label(Some("RENT")), "Rent");
        assert_eq!(category_label(None), "N/A");
    }

    #[test]
    fn known_categories_are_scoped_by_type() {
        assert!(is_known_category(TransactionType::Income, "RENT"));
        assert!(!is_known_category(TransactionType::Expense, "RENT"));
        assert!(is_known_category(TransactionType::Expense, "TAXES"));
    }
}
