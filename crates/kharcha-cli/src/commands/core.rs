//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `load_settings` - Shared setup used by most commands
//! - `month_period` / `year_period` - Period selection with current-date defaults
//! - `cmd_init` - Initialize the database
//! - `cmd_audit` - Show the audit log

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use kharcha_core::{config::Settings, db::Database, models::Period, AuditFilter};

use super::truncate;

/// Actor recorded in the audit log for CLI changes
pub const CLI_ACTOR: &str = "cli";

/// Open (or create) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Load settings from `--config`, the data-dir override, or built-in defaults
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let settings = Settings::load(config).context("Failed to load settings")?;
    match &settings.source {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded settings"),
        None => tracing::debug!("Using built-in settings"),
    }
    Ok(settings)
}

/// A month, defaulting to the current month/year
pub fn month_period(year: Option<i32>, month: Option<u32>) -> Result<Period> {
    let today = Utc::now().date_naive();
    let period = Period::month(
        year.unwrap_or(today.year()),
        month.unwrap_or(today.month()),
    )?;
    Ok(period)
}

/// A year, defaulting to the current year
pub fn year_period(year: Option<i32>) -> Result<Period> {
    let today = Utc::now().date_naive();
    Ok(Period::year(year.unwrap_or(today.year()))?)
}

/// Period filter for listing: none, a year, or a month of a year
pub fn optional_period(year: Option<i32>, month: Option<u32>) -> Result<Option<Period>> {
    match (year, month) {
        (Some(year), Some(month)) => Ok(Some(Period::month(year, month)?)),
        (Some(year), None) => Ok(Some(Period::year(year)?)),
        (None, Some(_)) => anyhow::bail!("--month requires --year"),
        (None, None) => Ok(None),
    }
}

pub fn cmd_init(db_path: &Path, settings: &Settings, load_budgets: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    match &settings.source {
        Some(path) => println!("   Settings: {}", path.display()),
        None => println!("   Settings: built-in defaults"),
    }
    println!("   Budget mode: {}", settings.budget_mode);

    if load_budgets {
        let loaded = db
            .load_budgets(&settings.budgets)
            .context("Failed to load budgets from settings")?;
        db.log_audit(CLI_ACTOR, "load", Some("budget"), None, Some(&format!("{} lines", loaded)))?;
        println!("   Loaded {} budget lines", loaded);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: kharcha add 450 VARIABLE PETROL -d \"Fuel\"");
    println!("  2. Or import a CSV:   kharcha import --file expenses.csv");
    println!("  3. See the month:     kharcha report monthly");

    Ok(())
}

pub fn cmd_audit(db: &Database, limit: i64, filter: &AuditFilter) -> Result<()> {
    let entries = db.list_audit_log(limit.max(1), filter)?;

    if entries.is_empty() {
        println!("No matching audit entries.");
        return Ok(());
    }

    println!();
    println!("📜 Audit Log");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries {
        let target = match (&entry.entity_type, entry.entity_id) {
            (Some(kind), Some(id)) => format!("{} #{}", kind, id),
            (Some(kind), None) => kind.clone(),
            _ => String::new(),
        };
        println!(
            "   {} │ {:16} │ {:18} │ {:14} │ {}",
            entry.timestamp,
            truncate(&entry.actor, 16),
            entry.action,
            target,
            truncate(entry.details.as_deref().unwrap_or(""), 30)
        );
    }

    Ok(())
}
