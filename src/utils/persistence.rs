use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{errors::LedgerError, ledger::Transaction};

/// Snapshot shapes accepted on load: a bare array or the API's response envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    List(Vec<Transaction>),
    Envelope { transactions: Vec<Transaction> },
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    transactions: &'a [Transaction],
}

/// Writes the transactions to disk atomically by staging to a temporary file.
pub fn save_transactions_to_file(transactions: &[Transaction], path: &Path) -> Result<(), LedgerError> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(&EnvelopeRef { transactions })?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads a transaction snapshot from disk, returning structured errors on failure.
pub fn load_transactions_from_file(path: &Path) -> Result<Vec<Transaction>, LedgerError> {
    let data = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&data)?;
    let transactions = match snapshot {
        Snapshot::List(transactions) | Snapshot::Envelope { transactions } => transactions,
    };
    tracing::debug!(path = %path.display(), count = transactions.len(), "loaded snapshot");
    Ok(transactions)
}
