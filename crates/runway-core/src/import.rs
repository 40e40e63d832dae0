//! CSV ingestion for transaction history
//!
//! Expects a headered file with `date, amount, merchant, category, account`
//! columns (any order, case-insensitive). Dates are tried against a few
//! common formats; a blank or unrecognized date falls back to today so a
//! ragged export still aggregates. Amounts must parse - a malformed amount
//! is the one thing this adapter rejects.

use std::io::Read;

use chrono::{Local, NaiveDate};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parse transaction CSV data into well-typed transactions.
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let date_col = column("date");
    let amount_col = column("amount");
    let merchant_col = column("merchant");
    let category_col = column("category");
    let account_col = column("account");

    let mut transactions = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |col: Option<usize>| col.and_then(|i| record.get(i)).unwrap_or("");

        let amount_raw = field(amount_col);
        let amount: f64 = amount_raw
            .parse()
            .map_err(|_| Error::Import(format!("invalid amount: {amount_raw:?}")))?;

        transactions.push(Transaction {
            date: parse_date(field(date_col)),
            amount,
            merchant: field(merchant_col).to_string(),
            category: field(category_col).to_string(),
            account: field(account_col).to_string(),
        });
    }

    debug!(count = transactions.len(), "Parsed transaction CSV");
    Ok(transactions)
}

fn parse_date(raw: &str) -> NaiveDate {
    let raw = raw.trim();
    if !raw.is_empty() {
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return date;
            }
        }
    }
    Local::now().date_naive()
}
