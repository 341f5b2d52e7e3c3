//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::taxonomy::Category;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn expense(on: NaiveDate, amount: &str, category: &str, tag: &str) -> NewExpense {
        NewExpense::parse(on, d(amount), "test expense", category, tag).unwrap()
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.count_expenses(None).unwrap(), 0);
        assert!(db.list_budgets().unwrap().is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'date', 'amount', 'description', 'category', 'tag', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 7, "expenses table should have 7 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('budgets') WHERE name IN ('category', 'tag', 'amount')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 3);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        db.insert_expense(&expense(date(2024, 1, 5), "100", "FIXED", "RENT"))
            .unwrap();

        // Reopening the same file must not lose data
        let reopened = Database::new(db.path()).unwrap();
        assert_eq!(reopened.count_expenses(None).unwrap(), 1);
    }

    #[test]
    fn test_insert_and_get_expense() {
        let db = Database::in_memory().unwrap();

        let stored = db
            .insert_expense(&expense(date(2024, 1, 5), "1234.56", "variable", "groceries"))
            .unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.amount, d("1234.56"));
        assert_eq!(stored.category, Category::Variable);
        assert_eq!(stored.tag, "GROCERIES");

        let fetched = db.get_expense(stored.id).unwrap().unwrap();
        assert_eq!(fetched, stored);

        assert!(db.get_expense(9999).unwrap().is_none());
    }

    #[test]
    fn test_insert_rejects_invalid_expense() {
        let db = Database::in_memory().unwrap();

        let mut bad = expense(date(2024, 1, 5), "10", "FIXED", "RENT");
        bad.tag = "PETROL".to_string();
        assert!(db.insert_expense(&bad).is_err());

        let mut bad = expense(date(2024, 1, 5), "10", "FIXED", "RENT");
        bad.amount = Decimal::ZERO;
        assert!(db.insert_expense(&bad).is_err());

        assert_eq!(db.count_expenses(None).unwrap(), 0);
    }

    #[test]
    fn test_list_expenses_by_period() {
        let db = Database::in_memory().unwrap();
        db.insert_expense(&expense(date(2024, 1, 1), "10", "FIXED", "RENT"))
            .unwrap();
        db.insert_expense(&expense(date(2024, 1, 31), "20", "FIXED", "RENT"))
            .unwrap();
        db.insert_expense(&expense(date(2024, 2, 1), "30", "FIXED", "RENT"))
            .unwrap();
        db.insert_expense(&expense(date(2023, 12, 31), "40", "FIXED", "RENT"))
            .unwrap();

        let january = Period::month(2024, 1).unwrap();
        let listed = db.list_expenses(Some(&january), 100, 0).unwrap();
        assert_eq!(listed.len(), 2);
        // Newest first
        assert_eq!(listed[0].date, date(2024, 1, 31));
        assert_eq!(listed[1].date, date(2024, 1, 1));

        assert_eq!(db.count_expenses(Some(&january)).unwrap(), 2);
        assert_eq!(
            db.count_expenses(Some(&Period::year(2024).unwrap())).unwrap(),
            3
        );
        assert_eq!(db.count_expenses(None).unwrap(), 4);

        let in_period = db.expenses_in_period(&january).unwrap();
        assert_eq!(in_period[0].date, date(2024, 1, 1));

        let page = db.list_expenses(None, 2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[1].date, date(2023, 12, 31));
    }

    #[test]
    fn test_insert_expenses_all_or_nothing() {
        let db = Database::in_memory().unwrap();

        let mut batch = vec![
            expense(date(2024, 3, 1), "10", "FIXED", "RENT"),
            expense(date(2024, 3, 2), "20", "VARIABLE", "PETROL"),
        ];
        assert_eq!(db.insert_expenses(&batch).unwrap(), 2);

        batch[1].amount = d("-5");
        assert!(db.insert_expenses(&batch).is_err());
        assert_eq!(db.count_expenses(None).unwrap(), 2);
    }

    #[test]
    fn test_budget_upsert_and_list_order() {
        let db = Database::in_memory().unwrap();

        db.set_budget("VARIABLE", Some("petrol"), d("3000")).unwrap();
        db.set_budget("FIXED", Some("RENT"), d("15000")).unwrap();
        db.set_budget("FIXED", None, d("20000")).unwrap();
        // Replaces the earlier RENT line
        db.set_budget("fixed", Some("rent"), d("16000")).unwrap();

        let budgets = db.list_budgets().unwrap();
        assert_eq!(budgets.len(), 3);
        assert_eq!(budgets[0].category, Category::Fixed);
        assert_eq!(budgets[0].tag, None);
        assert_eq!(budgets[1].tag.as_deref(), Some("RENT"));
        assert_eq!(budgets[1].amount, d("16000"));
        assert_eq!(budgets[2].category, Category::Variable);
        assert_eq!(budgets[2].tag.as_deref(), Some("PETROL"));
    }

    #[test]
    fn test_budget_validation() {
        let db = Database::in_memory().unwrap();
        assert!(db.set_budget("FIXED", Some("PETROL"), d("1")).is_err());
        assert!(db.set_budget("TRAVEL", None, d("1")).is_err());
        assert!(db.set_budget("FIXED", Some("RENT"), d("-1")).is_err());
        assert!(db.set_budget("FIXED", Some("RENT"), d("0.005")).is_err());
        assert!(db.set_budget("FIXED", None, d("1000000000.01")).is_err());
        // Zero is a valid budget
        assert!(db.set_budget("FIXED", Some("RENT"), Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_remove_and_clear_budgets() {
        let db = Database::in_memory().unwrap();
        db.set_budget("FIXED", Some("RENT"), d("100")).unwrap();
        db.set_budget("FIXED", None, d("200")).unwrap();

        assert!(db.remove_budget("FIXED", Some("RENT")).unwrap());
        assert!(!db.remove_budget("FIXED", Some("RENT")).unwrap());
        assert_eq!(db.list_budgets().unwrap().len(), 1);

        let entries = vec![
            BudgetEntry {
                category: Category::Insurance,
                tag: Some("TERM_LIFE".into()),
                amount: d("1200"),
            },
            BudgetEntry {
                category: Category::Fixed,
                tag: None,
                amount: d("300"),
            },
        ];
        assert_eq!(db.load_budgets(&entries).unwrap(), 2);
        let budgets = db.list_budgets().unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].amount, d("300"));

        assert_eq!(db.clear_budgets().unwrap(), 2);
        assert!(db.list_budgets().unwrap().is_empty());
    }

    #[test]
    fn test_analyze_period_uses_stored_budgets() {
        let db = Database::in_memory().unwrap();
        db.set_budget("VARIABLE", Some("GROCERIES"), d("5000")).unwrap();
        db.insert_expense(&expense(date(2024, 1, 10), "6000", "VARIABLE", "GROCERIES"))
            .unwrap();

        let january = Period::month(2024, 1).unwrap();
        let data = db
            .analyze_period(&january, BudgetMode::Derived)
            .unwrap()
            .unwrap();
        assert_eq!(data.summary.total_expenses, d("6000"));
        assert_eq!(data.summary.total_budget, d("5000"));
        assert_eq!(data.summary.status, BudgetStatus::Over);
        data.check_consistency().unwrap();

        let february = Period::month(2024, 2).unwrap();
        assert!(db
            .analyze_period(&february, BudgetMode::Derived)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        let id = db
            .log_audit("cli", "create", Some("expense"), Some(1), Some("RENT"))
            .unwrap();
        assert!(id > 0);
        db.log_audit("api", "monthly_analysis", None, None, None)
            .unwrap();

        let all = AuditFilter::default();
        let entries = db.list_audit_log(10, &all).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].actor, "api");
        assert_eq!(entries[1].entity_type.as_deref(), Some("expense"));

        assert_eq!(db.list_audit_log(1, &all).unwrap().len(), 1);
    }

    #[test]
    fn test_audit_log_filters() {
        let db = Database::in_memory().unwrap();
        db.log_audit("cli", "create", Some("expense"), Some(1), None)
            .unwrap();
        db.log_audit("cli", "create", Some("expense"), Some(2), None)
            .unwrap();
        db.log_audit("api:curl/8.5", "view", Some("expense"), Some(2), None)
            .unwrap();
        db.log_audit("api", "update", Some("budget"), None, Some("FIXED/RENT"))
            .unwrap();
        db.log_audit("apiary", "list", Some("budget"), None, None)
            .unwrap();

        let history = db
            .list_audit_log(10, &AuditFilter::entity("expense", Some(2)))
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, "view");
        assert_eq!(history[1].action, "create");

        let budgets = db
            .list_audit_log(10, &AuditFilter::entity("budget", None))
            .unwrap();
        assert_eq!(budgets.len(), 2);

        // `api` covers every user agent but not a different actor sharing the prefix
        let api = AuditFilter {
            actor: Some("api".into()),
            ..Default::default()
        };
        let entries = db.list_audit_log(10, &api).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.actor.starts_with("api") && e.actor != "apiary"));
    }
}
