//! Budget operations
//!
//! Budgets are monthly amounts. A row with `tag = ''` is the category-level
//! line; every other row belongs to one tag of the category.

use rust_decimal::Decimal;
use rusqlite::params;
use tracing::debug;

use super::{decimal_column, parsed_column, Database};
use crate::analysis::BudgetPlan;
use crate::error::{Error, Result};
use crate::models::{check_amount_range, BudgetEntry};
use crate::taxonomy::{self, Category};

/// Validate a budget line and canonicalize its tag
fn normalize(category: &str, tag: Option<&str>, amount: Decimal) -> Result<BudgetEntry> {
    if amount < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "Budget must not be negative, got {}",
            amount
        )));
    }
    check_amount_range(amount)?;

    match tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => {
            let (category, tag) = taxonomy::validate_pair(category, tag)?;
            Ok(BudgetEntry {
                category,
                tag: Some(tag.to_string()),
                amount,
            })
        }
        None => {
            let category: Category = category.parse().map_err(Error::Validation)?;
            Ok(BudgetEntry {
                category,
                tag: None,
                amount,
            })
        }
    }
}

impl Database {
    /// Set (insert or replace) a monthly budget line
    pub fn set_budget(
        &self,
        category: &str,
        tag: Option<&str>,
        amount: Decimal,
    ) -> Result<BudgetEntry> {
        let entry = normalize(category, tag, amount)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO budgets (category, tag, amount) VALUES (?, ?, ?)
            ON CONFLICT(category, tag) DO UPDATE SET
                amount = excluded.amount,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                entry.category.as_str(),
                entry.tag.as_deref().unwrap_or(""),
                entry.amount.to_string(),
            ],
        )?;

        debug!(category = %entry.category, tag = ?entry.tag, amount = %entry.amount, "Budget set");
        Ok(entry)
    }

    /// Remove a budget line. Returns false if there was nothing to remove.
    pub fn remove_budget(&self, category: &str, tag: Option<&str>) -> Result<bool> {
        let entry = normalize(category, tag, Decimal::ZERO)?;
        let conn = self.conn()?;

        let removed = conn.execute(
            "DELETE FROM budgets WHERE category = ? AND tag = ?",
            params![entry.category.as_str(), entry.tag.as_deref().unwrap_or("")],
        )?;
        Ok(removed > 0)
    }

    /// All budget lines, in taxonomy order with the category line first
    pub fn list_budgets(&self) -> Result<Vec<BudgetEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT category, tag, amount FROM budgets")?;

        let rows = stmt
            .query_map([], |row| {
                let category: Category = parsed_column(row, 0)?;
                let tag: String = row.get(1)?;
                Ok(BudgetEntry {
                    category,
                    tag: if tag.is_empty() { None } else { Some(tag) },
                    amount: decimal_column(row, 2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Rows whose tag has left the taxonomy are dropped here
        Ok(BudgetPlan::from_entries(&rows).entries())
    }

    /// Delete every budget line. Returns how many were removed.
    pub fn clear_budgets(&self) -> Result<usize> {
        let conn = self.conn()?;
        Ok(conn.execute("DELETE FROM budgets", [])?)
    }

    /// Upsert a batch of budget lines in one transaction
    pub fn load_budgets(&self, entries: &[BudgetEntry]) -> Result<usize> {
        let normalized = entries
            .iter()
            .map(|e| normalize(e.category.as_str(), e.tag.as_deref(), e.amount))
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO budgets (category, tag, amount) VALUES (?, ?, ?)
                ON CONFLICT(category, tag) DO UPDATE SET
                    amount = excluded.amount,
                    updated_at = CURRENT_TIMESTAMP
                "#,
            )?;
            for entry in &normalized {
                stmt.execute(params![
                    entry.category.as_str(),
                    entry.tag.as_deref().unwrap_or(""),
                    entry.amount.to_string(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(normalized.len())
    }
}
