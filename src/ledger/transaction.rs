use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::is_known_category;
use super::time_interval::RecurringInterval;

/// Backend limit on description length.
pub const MAX_DESCRIPTION_WORDS: usize = 15;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interpreted form of the raw `recurringInterval` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    /// No tag, an empty tag, or `NONE`.
    OneOff,
    Every(RecurringInterval),
    /// A tag this engine does not understand; such records never recur.
    Unrecognized(String),
}

impl Recurrence {
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(tag) = raw.map(str::trim).filter(|tag| !tag.is_empty()) else {
            return Recurrence::OneOff;
        };
        if tag.eq_ignore_ascii_case("NONE") {
            return Recurrence::OneOff;
        }
        match RecurringInterval::parse(tag) {
            Some(interval) => Recurrence::Every(interval),
            None => Recurrence::Unrecognized(tag.to_string()),
        }
    }

    pub fn interval(&self) -> Option<RecurringInterval> {
        match self {
            Recurrence::Every(interval) => Some(*interval),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Recurrence::Every(_))
    }

    pub fn label(&self) -> String {
        match self {
            Recurrence::OneOff => "No".into(),
            Recurrence::Every(interval) => interval.label().into(),
            Recurrence::Unrecognized(tag) => tag.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyRef {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitRef {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub label: String,
}

/// A financial record as delivered by the RentEase API.
///
/// `date` keeps the raw string so that a malformed value can be carried through
/// and excluded from occurrence queries instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub property_id: Uuid,
    #[serde(default)]
    pub unit_id: Option<Uuid>,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub recurring_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitRef>,
}

impl Transaction {
    pub fn new(property_id: Uuid, kind: TransactionType, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            unit_id: None,
            amount,
            description: String::new(),
            date: date.format(DATE_FORMAT).to_string(),
            kind,
            category: None,
            recurring_interval: None,
            created_at: None,
            updated_at: None,
            property: None,
            unit: None,
        }
    }

    pub fn with_interval(mut self, interval: RecurringInterval) -> Self {
        self.recurring_interval = Some(interval.as_str().to_string());
        self
    }

    pub fn with_unit(mut self, unit_id: Uuid, label: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id);
        self.unit = Some(UnitRef {
            id: Some(unit_id),
            label: label.into(),
        });
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// The anchor (first occurrence) date, or `None` when `date` is malformed.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    pub fn recurrence(&self) -> Recurrence {
        Recurrence::from_raw(self.recurring_interval.as_deref())
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence().is_recurring()
    }

    /// Creation instant in epoch milliseconds; missing or unparseable values sort as 0.
    pub fn created_at_millis(&self) -> i64 {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp_millis)
            .unwrap_or(0)
    }

    pub fn property_title(&self) -> Option<&str> {
        self.property.as_ref().map(|property| property.title.as_str())
    }

    pub fn unit_label(&self) -> Option<&str> {
        self.unit.as_ref().map(|unit| unit.label.as_str())
    }

    /// Lists data-quality problems without rejecting the record.
    pub fn validate(&self) -> Vec<DataIssue> {
        let mut issues = Vec::new();
        if self.anchor_date().is_none() {
            issues.push(DataIssue::MalformedDate(self.date.clone()));
        }
        if self.amount.is_nan() || self.amount <= 0.0 {
            issues.push(DataIssue::NonPositiveAmount(self.amount));
        }
        let words = word_count(&self.description);
        if words > MAX_DESCRIPTION_WORDS {
            issues.push(DataIssue::DescriptionTooLong { words });
        }
        if let Recurrence::Unrecognized(tag) = self.recurrence() {
            issues.push(DataIssue::UnrecognizedInterval(tag));
        }
        if let Some(category) = self.category.as_deref() {
            if !is_known_category(self.kind, category) {
                issues.push(DataIssue::UnknownCategory(category.to_string()));
            }
        }
        issues
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataIssue {
    MalformedDate(String),
    NonPositiveAmount(f64),
    DescriptionTooLong { words: usize },
    UnrecognizedInterval(String),
    UnknownCategory(String),
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIssue::MalformedDate(raw) => write!(f, "date `{raw}` is not a calendar date"),
            DataIssue::NonPositiveAmount(amount) => write!(f, "amount {amount} is not positive"),
            DataIssue::DescriptionTooLong { words } => write!(
                f,
                "description has {words} words (limit {MAX_DESCRIPTION_WORDS})"
            ),
            DataIssue::UnrecognizedInterval(tag) => {
                write!(f, "recurring interval `{tag}` is not recognized")
            }
            DataIssue::UnknownCategory(category) => {
                write!(f, "category `{category}` does not match the transaction type")
            }
        }
    }
}

/// Extracts the calendar date from the date shapes the API produces. Time of day
/// and offsets are dropped; the date as written is kept.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|stamp| stamp.date())
}

fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let value = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.timestamp_millis());
    }
    if let Some(stamp) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(stamp.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|stamp| stamp.and_utc().timestamp_millis())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
