//! Budget command implementations

use anyhow::Result;
use kharcha_core::config::Settings;
use kharcha_core::db::Database;
use rust_decimal::Decimal;

use super::{format_amount, CLI_ACTOR};

fn line_label(category: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{}/{}", category, tag),
        None => format!("{} (category)", category),
    }
}

pub fn cmd_budget_list(db: &Database, settings: &Settings) -> Result<()> {
    let budgets = db.list_budgets()?;

    if budgets.is_empty() {
        println!("No budgets set. Set one with:");
        println!("  kharcha budget set VARIABLE 5000 --tag GROCERIES");
        println!("or load the ones declared in your settings:");
        println!("  kharcha budget load");
        return Ok(());
    }

    println!();
    println!("💰 Monthly Budgets (mode: {})", settings.budget_mode);
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in &budgets {
        println!(
            "   {:13} │ {:24} │ {:>14}",
            entry.category.as_str(),
            entry.tag.as_deref().unwrap_or("(category)"),
            format_amount(&settings.currency, entry.amount)
        );
    }

    let tag_total: Decimal = budgets
        .iter()
        .filter(|e| e.tag.is_some())
        .map(|e| e.amount)
        .sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Sum of tag budgets: {}",
        format_amount(&settings.currency, tag_total)
    );

    Ok(())
}

pub fn cmd_budget_set(
    db: &Database,
    category: &str,
    tag: Option<&str>,
    amount: Decimal,
    settings: &Settings,
) -> Result<()> {
    let entry = db.set_budget(category, tag, amount)?;
    let label = line_label(entry.category.as_str(), entry.tag.as_deref());

    db.log_audit(
        CLI_ACTOR,
        "update",
        Some("budget"),
        None,
        Some(&format!("{}={}", label, entry.amount)),
    )?;

    println!(
        "✅ Budget for {} set to {} per month",
        label,
        format_amount(&settings.currency, entry.amount)
    );
    Ok(())
}

pub fn cmd_budget_remove(db: &Database, category: &str, tag: Option<&str>) -> Result<()> {
    let label = line_label(&category.to_uppercase(), tag.map(str::to_uppercase).as_deref());

    if !db.remove_budget(category, tag)? {
        anyhow::bail!("No budget set for {}", label);
    }
    db.log_audit(CLI_ACTOR, "delete", Some("budget"), None, Some(&label))?;

    println!("✅ Removed budget for {}", label);
    Ok(())
}

pub fn cmd_budget_load(db: &Database, settings: &Settings) -> Result<()> {
    if settings.budgets.is_empty() {
        println!("No budgets declared in settings.");
        return Ok(());
    }

    let loaded = db.load_budgets(&settings.budgets)?;
    db.log_audit(
        CLI_ACTOR,
        "load",
        Some("budget"),
        None,
        Some(&format!("{} lines", loaded)),
    )?;

    match &settings.source {
        Some(path) => println!("✅ Loaded {} budget lines from {}", loaded, path.display()),
        None => println!("✅ Loaded {} budget lines from built-in defaults", loaded),
    }
    Ok(())
}

pub fn cmd_budget_clear(db: &Database) -> Result<()> {
    let removed = db.clear_budgets()?;
    db.log_audit(
        CLI_ACTOR,
        "clear",
        Some("budget"),
        None,
        Some(&format!("{} lines", removed)),
    )?;
    println!("✅ Cleared {} budget lines", removed);
    Ok(())
}
