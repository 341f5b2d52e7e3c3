//! Expense command implementations

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use kharcha_core::config::Settings;
use kharcha_core::db::Database;
use kharcha_core::import::parse_expenses_csv;
use kharcha_core::models::{NewExpense, Period};
use rust_decimal::Decimal;

use super::{format_amount, truncate, CLI_ACTOR};

pub fn cmd_add(
    db: &Database,
    amount: Decimal,
    category: &str,
    tag: &str,
    description: &str,
    date: Option<NaiveDate>,
    settings: &Settings,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let expense = NewExpense::parse(date, amount, description, category, tag)?;
    let stored = db.insert_expense(&expense)?;

    db.log_audit(
        CLI_ACTOR,
        "create",
        Some("expense"),
        Some(stored.id),
        Some(&format!("{}/{} {}", stored.category, stored.tag, stored.amount)),
    )?;

    println!(
        "✅ Recorded {} for {}/{} on {} (#{})",
        format_amount(&settings.currency, stored.amount),
        stored.category,
        stored.tag,
        stored.date,
        stored.id
    );
    Ok(())
}

pub fn cmd_list(
    db: &Database,
    period: Option<&Period>,
    limit: i64,
    settings: &Settings,
) -> Result<()> {
    let expenses = db.list_expenses(period, limit.max(1), 0)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  kharcha add 450 VARIABLE PETROL -d \"Fuel\"");
        return Ok(());
    }

    let total = db.count_expenses(period)?;

    println!();
    match period {
        Some(period) => println!("📝 Expenses · {} ({} total)", period.label(), total),
        None => println!("📝 Recent Expenses ({} total)", total),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses {
        println!(
            "   {} │ {:>12} │ {:13} │ {:24} │ {}",
            expense.date,
            format_amount(&settings.currency, expense.amount),
            expense.category.as_str(),
            truncate(&expense.tag, 24),
            truncate(&expense.description, 40)
        );
    }

    Ok(())
}

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing expenses from {}...", file.display());

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let expenses = parse_expenses_csv(csv_file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    println!("   Found {} expenses", expenses.len());

    let imported = db.insert_expenses(&expenses)?;
    db.log_audit(
        CLI_ACTOR,
        "import",
        Some("expense"),
        None,
        Some(&format!("{} rows from {}", imported, file.display())),
    )?;

    let dates = expenses.iter().map(|e| e.date);
    if let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) {
        println!("   Dates: {} to {}", first, last);
    }
    println!("✅ Imported {} expenses", imported);
    Ok(())
}
