//! CSV import for expenses
//!
//! Format: `date,amount,description,category,tag` with a header row.
//! Dates are `YYYY-MM-DD`. Every row goes through the same validation as a
//! single submitted expense; the first bad row aborts the import.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::NewExpense;

const EXPECTED_HEADERS: [&str; 5] = ["date", "amount", "description", "category", "tag"];

/// Parse expenses from CSV
pub fn parse_expenses_csv<R: Read>(reader: R) -> Result<Vec<NewExpense>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let found: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    if found != EXPECTED_HEADERS {
        return Err(Error::Import(format!(
            "Unexpected header: {} (expected {})",
            headers.iter().collect::<Vec<_>>().join(","),
            EXPECTED_HEADERS.join(",")
        )));
    }

    let mut expenses = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| Error::Import(format!("Row {}: {}", row, e)))?;

        let field = |i: usize| record.get(i).unwrap_or("");
        let date = parse_date(field(0)).map_err(|e| row_error(row, e))?;
        let amount = parse_amount(field(1)).map_err(|e| row_error(row, e))?;
        let expense = NewExpense::parse(date, amount, field(2), field(3), field(4))
            .map_err(|e| row_error(row, e))?;

        expenses.push(expense);
    }

    debug!("Parsed {} expenses from CSV", expenses.len());
    Ok(expenses)
}

fn row_error(row: usize, err: Error) -> Error {
    let msg = match err {
        Error::Validation(msg) | Error::Import(msg) => msg,
        other => other.to_string(),
    };
    Error::Import(format!("Row {}: {}", row, msg))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, tolerating thousands separators
fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s.trim().replace([',', ' '], "");
    cleaned
        .parse::<Decimal>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}
