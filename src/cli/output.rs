use colored::Colorize;
use serde::Serialize;
use std::fmt;

use crate::core::services::{Report, ReportRow, Summary, Timeline};
use crate::errors::LedgerError;
use crate::ledger::{category_label, DataIssue, Transaction};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
        MessageKind::Info => text,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Pretty JSON on stdout.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), LedgerError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Currency and separators used for amounts, derived from the configured locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub currency: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl MoneyFormat {
    pub fn new(locale: &str, currency: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (grouping_separator, decimal_separator) = match language.as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" => ('.', ','),
            "fr" | "sv" | "nb" | "fi" | "cs" | "pl" | "ru" => (' ', ','),
            _ => (',', '.'),
        };
        Self {
            currency: currency.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("en-PH", "PHP")
    }
}

/// Two decimals with thousands grouping, e.g. `1,234.50` for `en-PH`.
pub fn format_number(money: &MoneyFormat, value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(money.grouping_separator);
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}{}{fraction}", money.decimal_separator)
}

pub fn format_money(money: &MoneyFormat, value: f64) -> String {
    format!("{} {}", money.currency, format_number(money, value))
}

/// Unit amount, expanded to `a × n = t` when it occurred more than once.
pub fn amount_display(money: &MoneyFormat, amount: f64, occurrences: u32, total: f64) -> String {
    if occurrences > 1 {
        format!(
            "{} × {} = {}",
            format_money(money, amount),
            occurrences,
            format_money(money, total)
        )
    } else {
        format_money(money, amount)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn format_transaction_row(txn: &Transaction, money: &MoneyFormat) -> String {
    let location = match (txn.property_title(), txn.unit_label()) {
        (Some(property), Some(unit)) => format!("{property} / {unit}"),
        (Some(property), None) => property.to_string(),
        (None, Some(unit)) => unit.to_string(),
        (None, None) => String::from("-"),
    };
    format!(
        "{:10} {:7} {:20} {:24} {:20} {:8} {:>16}",
        truncate(&txn.date, 10),
        txn.kind.label(),
        truncate(&category_label(txn.category.as_deref()), 20),
        truncate(&txn.description, 24),
        truncate(&location, 20),
        truncate(&txn.recurrence().label(), 8),
        format_money(money, txn.amount)
    )
}

pub fn format_transaction_table(transactions: &[Transaction], money: &MoneyFormat) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }
    let mut output = format!(
        "{:10} {:7} {:20} {:24} {:20} {:8} {:>16}\n",
        "Date", "Type", "Category", "Description", "Property / Unit", "Recurs", "Amount"
    );
    output.push_str(&"-".repeat(111));
    output.push('\n');
    for txn in transactions {
        output.push_str(&format_transaction_row(txn, money));
        output.push('\n');
    }
    output
}

pub fn format_summary(summary: &Summary, money: &MoneyFormat) -> String {
    let net = format_money(money, summary.net);
    let net = if summary.net < 0.0 {
        net.bright_red().to_string()
    } else {
        net.bright_green().to_string()
    };
    let mut output = String::new();
    output.push_str(&format!("Income:        {}\n", format_money(money, summary.income)));
    output.push_str(&format!("Expenses:      {}\n", format_money(money, summary.expense)));
    output.push_str(&format!("Net:           {net}\n"));
    output.push_str(&format!("Profit margin: {:.1}%\n", summary.profit_margin));
    output.push_str(&format!(
        "Records:       {} ({} recurring, {} occurrences)\n",
        summary.record_count, summary.recurring_count, summary.occurrence_count
    ));
    if summary.malformed_count > 0 {
        output.push_str(
            &format!("Skipped:       {} with unreadable dates\n", summary.malformed_count)
                .bright_yellow()
                .to_string(),
        );
    }
    output
}

pub fn format_timeline(timeline: &Timeline, money: &MoneyFormat) -> String {
    let mut output = format!("{:10} {:>18} {:>18} {:>18}\n", "Period", "Income", "Expenses", "Net");
    for bucket in &timeline.buckets {
        output.push_str(&format!(
            "{:10} {:>18} {:>18} {:>18}\n",
            bucket.label,
            format_money(money, bucket.income),
            format_money(money, bucket.expense),
            format_money(money, bucket.net())
        ));
    }
    output.push_str(&format!(
        "\n{} occurrences, net profit {}, margin {:.1}%\n",
        timeline.occurrence_count,
        format_money(money, timeline.net_profit),
        timeline.profit_margin
    ));
    output
}

pub fn format_report_row(row: &ReportRow, money: &MoneyFormat) -> String {
    format!(
        "{} {:7} {:20} {:24} {:8} {}",
        row.date,
        row.kind.label(),
        truncate(&row.category, 20),
        truncate(&row.description, 24),
        truncate(&row.recurrence, 8),
        amount_display(money, row.amount, row.occurrences, row.total)
    )
}

pub fn format_report(report: &Report, money: &MoneyFormat) -> String {
    let mut output = format!("Generated on {}\n", report.generated_on);
    if let Some(window) = report.window {
        output.push_str(&format!("Period: {window}\n"));
    }
    output.push('\n');
    for row in &report.rows {
        output.push_str(&format_report_row(row, money));
        output.push('\n');
    }
    output.push_str(&format!(
        "\nTotal income {}, total expenses {}, net {} ({} records)\n",
        format_money(money, report.income),
        format_money(money, report.expense),
        format_money(money, report.net),
        report.record_count
    ));
    output
}

pub fn format_issues(txn: &Transaction, issues: &[DataIssue]) -> String {
    let mut output = format!("{} ({})\n", txn.id, txn.date);
    for issue in issues {
        output.push_str(&format!("  - {issue}\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_grouped() {
        let money = MoneyFormat::default();
        assert_eq!(format_number(&money, 0.0), "0.00");
        assert_eq!(format_number(&money, 999.5), "999.50");
        assert_eq!(format_number(&money, 1234567.891), "1,234,567.89");
        assert_eq!(format_number(&money, -4500.0), "-4,500.00");
    }

    #[test]
    fn separators_follow_the_locale() {
        let german = MoneyFormat::new("de-DE", "EUR");
        assert_eq!(format_money(&german, 1234567.5), "EUR 1.234.567,50");
        let french = MoneyFormat::new("fr_FR", "EUR");
        assert_eq!(format_number(&french, 2500.0), "2 500,00");
        assert_eq!(MoneyFormat::new("EN-us", "USD").grouping_separator, ',');
    }

    #[test]
    fn repeated_amounts_show_the_multiplication() {
        assert_eq!(amount_display(&MoneyFormat::default(), 1000.0, 1, 1000.0), "PHP 1,000.00");
        assert_eq!(
            amount_display(&MoneyFormat::default(), 1000.0, 4, 4000.0),
            "PHP 1,000.00 × 4 = PHP 4,000.00"
        );
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 6), "a ver…");
    }
}
