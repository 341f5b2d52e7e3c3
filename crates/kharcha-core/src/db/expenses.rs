//! Expense operations

use rusqlite::{params, Row};

use super::{decimal_column, parse_datetime, parsed_column, Database};
use crate::error::Result;
use crate::models::{Expense, NewExpense, Period};

const EXPENSE_COLUMNS: &str = "id, date, amount, description, category, tag, created_at";

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let created_at_str: String = row.get(6)?;
    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: decimal_column(row, 2)?,
        description: row.get(3)?,
        category: parsed_column(row, 4)?,
        tag: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Record an expense. The expense is validated before it is stored.
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (date, amount, description, category, tag) VALUES (?, ?, ?, ?, ?)",
            params![
                expense.date,
                expense.amount.to_string(),
                expense.description,
                expense.category.as_str(),
                expense.tag,
            ],
        )?;
        let id = conn.last_insert_rowid();

        let stored = conn.query_row(
            &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
            params![id],
            row_to_expense,
        )?;
        Ok(stored)
    }

    /// Get an expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
            params![id],
            row_to_expense,
        );

        match result {
            Ok(expense) => Ok(Some(expense)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List expenses, newest first, optionally limited to a period
    pub fn list_expenses(
        &self,
        period: Option<&Period>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let expenses = match period {
            Some(period) => {
                let (from, to) = period.date_range();
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM expenses WHERE date BETWEEN ? AND ? ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
                    EXPENSE_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![from, to, limit, offset], row_to_expense)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM expenses ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
                    EXPENSE_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![limit, offset], row_to_expense)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(expenses)
    }

    /// Count expenses, optionally limited to a period
    pub fn count_expenses(&self, period: Option<&Period>) -> Result<i64> {
        let conn = self.conn()?;
        let count = match period {
            Some(period) => {
                let (from, to) = period.date_range();
                conn.query_row(
                    "SELECT COUNT(*) FROM expenses WHERE date BETWEEN ? AND ?",
                    params![from, to],
                    |row| row.get(0),
                )?
            }
            None => conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// All expenses inside a period, oldest first
    pub fn expenses_in_period(&self, period: &Period) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let (from, to) = period.date_range();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE date BETWEEN ? AND ? ORDER BY date, id",
            EXPENSE_COLUMNS
        ))?;
        let expenses = stmt
            .query_map(params![from, to], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Insert many expenses in one transaction; all or nothing
    pub fn insert_expenses(&self, expenses: &[NewExpense]) -> Result<usize> {
        for expense in expenses {
            expense.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO expenses (date, amount, description, category, tag) VALUES (?, ?, ?, ?, ?)",
            )?;
            for expense in expenses {
                stmt.execute(params![
                    expense.date,
                    expense.amount.to_string(),
                    expense.description,
                    expense.category.as_str(),
                    expense.tag,
                ])?;
            }
        }
        tx.commit()?;

        Ok(expenses.len())
    }
}
