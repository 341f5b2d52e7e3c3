//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use kharcha_core::config::Settings;
use kharcha_core::db::Database;
use kharcha_core::models::{AnalysisData, BudgetMode, NewExpense, Period};
use kharcha_core::taxonomy::Category;
use kharcha_core::AuditFilter;
use rust_decimal::Decimal;

use crate::commands::{self, truncate};

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn settings() -> Settings {
    Settings::default()
}

/// January 2024: groceries 6000 against a 5000 budget, rent on budget
fn seeded_db() -> Database {
    let db = Database::in_memory().unwrap();
    let on = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    db.insert_expenses(&[
        NewExpense::parse(on(1), d("15000"), "Rent", "FIXED", "RENT").unwrap(),
        NewExpense::parse(on(9), d("6000"), "Groceries", "VARIABLE", "GROCERIES").unwrap(),
    ])
    .unwrap();
    db.set_budget("FIXED", Some("RENT"), d("15000")).unwrap();
    db.set_budget("VARIABLE", Some("GROCERIES"), d("5000")).unwrap();
    db
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_add() {
    let db = Database::in_memory().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();

    commands::cmd_add(&db, d("450"), "variable", "petrol", "Fuel", Some(date), &settings())
        .unwrap();

    let expenses = db.list_expenses(None, 10, 0).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, Category::Variable);
    assert_eq!(expenses[0].tag, "PETROL");
    assert_eq!(expenses[0].date, date);

    let audit = db.list_audit_log(10, &Default::default()).unwrap();
    assert_eq!(audit[0].actor, "cli");
    assert_eq!(audit[0].entity_id, Some(expenses[0].id));
}

#[test]
fn test_cmd_add_defaults_to_today() {
    let db = Database::in_memory().unwrap();
    commands::cmd_add(&db, d("10"), "FIXED", "DAIRY", "Milk", None, &settings()).unwrap();

    let expense = &db.list_expenses(None, 1, 0).unwrap()[0];
    let today = chrono::Utc::now().date_naive();
    assert_eq!(expense.date.year(), today.year());
}

#[test]
fn test_cmd_add_rejects_wrong_tag() {
    let db = Database::in_memory().unwrap();
    let result = commands::cmd_add(&db, d("10"), "FIXED", "PETROL", "Fuel", None, &settings());
    assert!(result.is_err());
    assert_eq!(db.count_expenses(None).unwrap(), 0);
}

#[test]
fn test_cmd_list() {
    let db = seeded_db();
    let january = Period::month(2024, 1).unwrap();
    assert!(commands::cmd_list(&db, Some(&january), 20, &settings()).is_ok());
    assert!(commands::cmd_list(&Database::in_memory().unwrap(), None, 20, &settings()).is_ok());
}

#[test]
fn test_cmd_import() {
    let db = Database::in_memory().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "date,amount,description,category,tag").unwrap();
    writeln!(file, "2024-03-01,15000,Rent,FIXED,RENT").unwrap();
    writeln!(file, "2024-03-04,1200,Term plan,INSURANCE,TERM_LIFE").unwrap();

    commands::cmd_import(&db, file.path()).unwrap();
    assert_eq!(db.count_expenses(None).unwrap(), 2);
}

#[test]
fn test_cmd_import_bad_row_imports_nothing() {
    let db = Database::in_memory().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "date,amount,description,category,tag").unwrap();
    writeln!(file, "2024-03-01,15000,Rent,FIXED,RENT").unwrap();
    writeln!(file, "2024-03-04,1200,Fuel,INSURANCE,PETROL").unwrap();

    let err = commands::cmd_import(&db, file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Row 2"));
    assert_eq!(db.count_expenses(None).unwrap(), 0);
}

#[test]
fn test_cmd_import_missing_file() {
    let db = Database::in_memory().unwrap();
    let result = commands::cmd_import(&db, std::path::Path::new("/nonexistent/expenses.csv"));
    assert!(result.is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budget_set_and_remove() {
    let db = Database::in_memory().unwrap();

    commands::cmd_budget_set(&db, "VARIABLE", Some("groceries"), d("5000"), &settings()).unwrap();
    commands::cmd_budget_set(&db, "VARIABLE", None, d("9000"), &settings()).unwrap();
    assert_eq!(db.list_budgets().unwrap().len(), 2);
    assert!(commands::cmd_budget_list(&db, &settings()).is_ok());

    commands::cmd_budget_remove(&db, "variable", Some("groceries")).unwrap();
    assert_eq!(db.list_budgets().unwrap().len(), 1);

    // Removing again is an error
    assert!(commands::cmd_budget_remove(&db, "VARIABLE", Some("GROCERIES")).is_err());
}

#[test]
fn test_cmd_budget_load_and_clear() {
    let db = Database::in_memory().unwrap();
    let settings = Settings::from_toml_str(
        r#"
        [budgets.FIXED]
        _category = 20000
        RENT = 15000
        "#,
    )
    .unwrap();

    commands::cmd_budget_load(&db, &settings).unwrap();
    let budgets = db.list_budgets().unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].tag, None);

    commands::cmd_budget_clear(&db).unwrap();
    assert!(db.list_budgets().unwrap().is_empty());
}

#[test]
fn test_cmd_init_loads_default_budgets() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("kharcha.db");
    let settings = Settings::load(Some(&dir.path().join("missing.toml"))).unwrap();

    commands::cmd_init(&db_path, &settings, true).unwrap();

    let db = commands::open_db(&db_path).unwrap();
    let budgets = db.list_budgets().unwrap();
    assert!(!budgets.is_empty());
    assert!(budgets
        .iter()
        .any(|b| b.category == Category::Fixed && b.tag.as_deref() == Some("RENT")));
}

// ========== Report Rendering Tests ==========

#[test]
fn test_render_no_data() {
    let text = commands::render_no_data(&Period::month(2024, 3).unwrap());
    assert!(text.contains("No Data Available"));
    assert!(text.contains("There is no expense data for March 2024."));

    let text = commands::render_no_data(&Period::year(2023).unwrap());
    assert!(text.contains("There is no expense data for Year 2023."));
}

#[test]
fn test_render_analysis() {
    let db = seeded_db();
    let january = Period::month(2024, 1).unwrap();
    let data = db
        .analyze_period(&january, BudgetMode::Derived)
        .unwrap()
        .unwrap();

    let text = commands::render_analysis(&data, &january, "₹", false);
    assert!(text.contains("Budget Analysis · January 2024"));
    assert!(text.contains("₹21,000.00"));
    assert!(text.contains("-₹1,000.00"));
    assert!(text.contains("FIXED"));
    assert!(text.contains("Over budget"));
    assert!(text.contains("VARIABLE: ₹6,000.00 spent of ₹5,000.00 (₹1,000.00 over)"));
    // Tags only with drill-down
    assert!(!text.contains("GROCERIES"));

    let text = commands::render_analysis(&data, &january, "₹", true);
    assert!(text.contains("GROCERIES"));
}

#[test]
fn test_render_report_without_categories_is_no_data() {
    let march = Period::month(2024, 3).unwrap();
    let empty: AnalysisData = serde_json::from_value(serde_json::json!({
        "summary": {"totalExpenses": 0, "totalBudget": 0, "difference": 0, "status": "on"},
        "categories": []
    }))
    .unwrap();

    let text = commands::render_report(Some(&empty), &march, "₹", false);
    assert!(text.contains("There is no expense data for March 2024."));
    assert_eq!(
        commands::render_report(None, &march, "₹", false),
        commands::render_no_data(&march)
    );

    let db = seeded_db();
    let january = Period::month(2024, 1).unwrap();
    let data = db
        .analyze_period(&january, BudgetMode::Derived)
        .unwrap();
    let text = commands::render_report(data.as_ref(), &january, "₹", false);
    assert!(text.contains("Budget Analysis · January 2024"));
}

#[test]
fn test_render_analysis_without_overruns() {
    let db = seeded_db();
    db.set_budget("VARIABLE", Some("GROCERIES"), d("7000")).unwrap();
    let january = Period::month(2024, 1).unwrap();
    let data = db
        .analyze_period(&january, BudgetMode::Derived)
        .unwrap()
        .unwrap();

    let text = commands::render_analysis(&data, &january, "$", false);
    assert!(!text.contains("Over budget"));
    assert!(text.contains("🟢 UNDER"));
}

#[test]
fn test_cmd_report() {
    let db = seeded_db();
    let january = Period::month(2024, 1).unwrap();
    let march = Period::month(2024, 3).unwrap();

    assert!(commands::cmd_report(&db, &january, BudgetMode::Derived, &settings(), false, true).is_ok());
    assert!(commands::cmd_report(&db, &january, BudgetMode::Configured, &settings(), true, false).is_ok());
    assert!(commands::cmd_report(&db, &march, BudgetMode::Derived, &settings(), false, false).is_ok());
}

#[test]
fn test_format_amount() {
    assert_eq!(commands::format_amount("₹", d("0")), "₹0.00");
    assert_eq!(commands::format_amount("₹", d("999.5")), "₹999.50");
    assert_eq!(commands::format_amount("₹", d("1234567.891")), "₹1,234,567.89");
    assert_eq!(commands::format_amount("$", d("-1000")), "-$1,000.00");
    assert_eq!(commands::format_amount("$", d("-0.001")), "$0.00");
}

// ========== Period Helpers ==========

#[test]
fn test_period_helpers() {
    assert_eq!(
        commands::month_period(Some(2024), Some(2)).unwrap(),
        Period::month(2024, 2).unwrap()
    );
    assert!(commands::month_period(Some(2024), Some(13)).is_err());
    assert_eq!(
        commands::year_period(Some(2023)).unwrap(),
        Period::year(2023).unwrap()
    );

    let today = chrono::Utc::now().date_naive();
    assert_eq!(
        commands::month_period(None, None).unwrap(),
        Period::containing(today)
    );

    assert!(commands::optional_period(None, Some(1)).is_err());
    assert_eq!(commands::optional_period(None, None).unwrap(), None);
}

// ========== Misc ==========

#[test]
fn test_cmd_categories() {
    assert!(commands::cmd_categories(None).is_ok());
    assert!(commands::cmd_categories(Some("insurance")).is_ok());
    assert!(commands::cmd_categories(Some("TRAVEL")).is_err());
}

#[test]
fn test_cmd_audit() {
    let db = seeded_db();
    assert!(commands::cmd_audit(&db, 10, &AuditFilter::default()).is_ok());
    commands::cmd_budget_clear(&db).unwrap();
    assert!(commands::cmd_audit(&db, 10, &AuditFilter::default()).is_ok());
    assert!(commands::cmd_audit(&db, 10, &AuditFilter::entity("budget", None)).is_ok());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer description", 10), "a much ...");
    assert_eq!(truncate("चाय नाश्ता बहुत", 6), "चाय...");
}
