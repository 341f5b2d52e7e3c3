//! Integration tests for kharcha-core
//!
//! These tests exercise the full import → budget → analysis workflow.

use std::str::FromStr;

use kharcha_core::{
    config::Settings,
    db::Database,
    import::parse_expenses_csv,
    models::{BudgetMode, BudgetStatus, Period},
    taxonomy::{self, Category},
};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Two months of household spending
fn household_csv() -> &'static str {
    r#"date,amount,description,category,tag
2024-01-01,15000,Rent,FIXED,RENT
2024-01-03,1450,Electricity bill,FIXED,ELECTRICITY
2024-01-05,2200,Weekly groceries,VARIABLE,GROCERIES
2024-01-12,2300,Weekly groceries,VARIABLE,GROCERIES
2024-01-19,1500,Weekly groceries,VARIABLE,GROCERIES
2024-01-20,2800.50,Fuel,VARIABLE,PETROL
2024-01-25,10000,Index fund,INVESTMENT,SIP_LONG_TERM
2024-02-01,15000,Rent,FIXED,RENT
2024-02-10,900,Groceries,VARIABLE,GROCERIES"#
}

fn seeded_db() -> Database {
    let db = Database::in_memory().expect("Failed to create database");
    let expenses = parse_expenses_csv(household_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(db.insert_expenses(&expenses).unwrap(), 9);

    let settings = Settings::from_toml_str(
        r#"
        [budgets.FIXED]
        RENT = 15000
        ELECTRICITY = 1500

        [budgets.VARIABLE]
        GROCERIES = 5000
        PETROL = 3000
        "#,
    )
    .unwrap();
    db.load_budgets(&settings.budgets).unwrap();
    db
}

// =============================================================================
// Monthly analysis
// =============================================================================

#[test]
fn test_monthly_workflow() {
    let db = seeded_db();
    let january = Period::month(2024, 1).unwrap();

    let data = db
        .analyze_period(&january, BudgetMode::Derived)
        .unwrap()
        .expect("January has expenses");
    data.check_consistency().unwrap();

    assert_eq!(data.summary.total_expenses, d("35250.50"));
    assert_eq!(data.summary.total_budget, d("24500"));
    assert_eq!(data.summary.status, BudgetStatus::Over);
    assert_eq!(
        data.summary.difference,
        data.summary.total_budget - data.summary.total_expenses
    );

    // Categories in taxonomy order
    let order: Vec<Category> = data.categories.iter().map(|c| c.category).collect();
    assert_eq!(
        order,
        vec![Category::Fixed, Category::Variable, Category::Investment]
    );

    let fixed = data.category(Category::Fixed).unwrap();
    assert_eq!(fixed.total, d("16450"));
    assert_eq!(fixed.status, BudgetStatus::Under);
    let rent = fixed.tags.iter().find(|t| t.tag == "RENT").unwrap();
    assert_eq!(rent.status, BudgetStatus::On);

    let variable = data.category(Category::Variable).unwrap();
    let groceries = variable.tags.iter().find(|t| t.tag == "GROCERIES").unwrap();
    assert_eq!(groceries.total, d("6000"));
    assert_eq!(groceries.status, BudgetStatus::Over);
    assert!(variable.total >= d("6000"));

    // Unbudgeted spend is still counted
    let investment = data.category(Category::Investment).unwrap();
    assert_eq!(investment.budget, Decimal::ZERO);
    assert_eq!(investment.status, BudgetStatus::Over);

    for category in &data.categories {
        for tag in &category.tags {
            assert!(taxonomy::is_valid_tag(category.category, &tag.tag));
        }
    }
}

#[test]
fn test_month_without_expenses_is_none() {
    let db = seeded_db();
    let march = Period::month(2024, 3).unwrap();
    assert!(db
        .analyze_period(&march, BudgetMode::Derived)
        .unwrap()
        .is_none());
}

#[test]
fn test_analysis_is_repeatable() {
    let db = seeded_db();
    let february = Period::month(2024, 2).unwrap();

    let first = db.analyze_period(&february, BudgetMode::Derived).unwrap();
    let second = db.analyze_period(&february, BudgetMode::Derived).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// =============================================================================
// Yearly analysis
// =============================================================================

#[test]
fn test_yearly_scales_budgets() {
    let db = seeded_db();
    let year = Period::year(2024).unwrap();

    let data = db
        .analyze_period(&year, BudgetMode::Derived)
        .unwrap()
        .unwrap();
    data.check_consistency().unwrap();

    assert_eq!(data.summary.total_expenses, d("51150.50"));
    assert_eq!(data.summary.total_budget, d("294000"));
    assert_eq!(data.summary.status, BudgetStatus::Under);
    assert!(data.summary.difference > Decimal::ZERO);
}

// =============================================================================
// Configured category budgets
// =============================================================================

#[test]
fn test_configured_mode_uses_category_line() {
    let db = seeded_db();
    db.set_budget("VARIABLE", None, d("10000")).unwrap();
    let january = Period::month(2024, 1).unwrap();

    let derived = db
        .analyze_period(&january, BudgetMode::Derived)
        .unwrap()
        .unwrap();
    assert_eq!(
        derived.category(Category::Variable).unwrap().budget,
        d("8000")
    );

    let configured = db
        .analyze_period(&january, BudgetMode::Configured)
        .unwrap()
        .unwrap();
    let variable = configured.category(Category::Variable).unwrap();
    assert_eq!(variable.budget, d("10000"));
    assert_eq!(variable.status, BudgetStatus::Under);
    configured.check_consistency().unwrap();
}
