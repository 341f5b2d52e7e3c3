//! Kharcha Core Library
//!
//! Shared functionality for the Kharcha expense tracker:
//! - Category/tag taxonomy and expense validation
//! - Spend-vs-budget analysis for a month or a year
//! - Database access and migrations
//! - CSV import of expenses
//! - Settings (budget mode, currency, declared budgets)
//! - HTTP client for the analysis endpoints

pub mod analysis;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod taxonomy;

/// Test utilities including a mock analysis server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{analyze, classify, BudgetPlan};
pub use client::{AnalysisClient, PeriodView, RequestSequencer, ViewState};
pub use config::Settings;
pub use db::{AuditEntry, AuditFilter, Database};
pub use error::{Error, Result};
pub use models::{
    AnalysisData, AnalysisSummary, BudgetEntry, BudgetMode, BudgetStatus, CategoryAnalysis,
    Expense, NewExpense, Period, TagAnalysis,
};
pub use taxonomy::Category;
