//! Domain models for Kharcha

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::taxonomy::{self, Category};

/// Largest single expense or monthly budget accepted
///
/// Analysis amounts cross the API as JSON numbers (f64, about 15 significant
/// digits). Ten integer digits plus cents keeps every amount, and yearly totals
/// built from them, exact after the round trip.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// Most decimal places an amount may carry
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// Reject amounts that would lose precision on the wire
pub fn check_amount_range(amount: Decimal) -> Result<()> {
    if amount.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(Error::Validation(format!(
            "Amount {} exceeds the maximum of {}",
            amount, MAX_AMOUNT
        )));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(Error::Validation(format!(
            "Amount {} has more than {} decimal places",
            amount, MAX_AMOUNT_SCALE
        )));
    }
    Ok(())
}

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub tag: String,
    pub created_at: DateTime<Utc>,
}

/// An expense to be recorded (before DB insertion)
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub tag: String,
}

impl NewExpense {
    /// Build a validated expense from raw user input
    pub fn parse(
        date: NaiveDate,
        amount: Decimal,
        description: &str,
        category: &str,
        tag: &str,
    ) -> Result<Self> {
        let (category, tag) = taxonomy::validate_pair(category, tag)?;
        let expense = Self {
            date,
            amount,
            description: description.trim().to_string(),
            category,
            tag: tag.to_string(),
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Check acceptance preconditions: positive amount, description present,
    /// tag belongs to the category
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Amount must be positive, got {}",
                self.amount
            )));
        }
        check_amount_range(self.amount)?;
        if self.description.trim().is_empty() {
            return Err(Error::Validation("Description is required".into()));
        }
        if !taxonomy::is_valid_tag(self.category, &self.tag) {
            return Err(Error::Validation(format!(
                "Tag {} is not valid for category {}",
                self.tag, self.category
            )));
        }
        Ok(())
    }
}

/// Spend compared to budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Over,
    On,
    Under,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::On => "on",
            Self::Under => "under",
        }
    }
}

impl std::str::FromStr for BudgetStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "over" => Ok(Self::Over),
            "on" => Ok(Self::On),
            "under" => Ok(Self::Under),
            _ => Err(format!("Unknown budget status: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spend vs budget for one tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAnalysis {
    pub tag: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub status: BudgetStatus,
}

/// Spend vs budget for one category, with its tag breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    pub status: BudgetStatus,
    pub tags: Vec<TagAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_budget: Decimal,
    /// `total_budget - total_expenses`; positive means money left over
    #[serde(with = "rust_decimal::serde::float")]
    pub difference: Decimal,
    pub status: BudgetStatus,
}

/// Full analysis for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    pub summary: AnalysisSummary,
    pub categories: Vec<CategoryAnalysis>,
}

impl AnalysisData {
    /// Categories whose spend exceeded their budget
    pub fn over_budget_categories(&self) -> impl Iterator<Item = &CategoryAnalysis> {
        self.categories
            .iter()
            .filter(|c| c.status == BudgetStatus::Over)
    }

    /// Look up one category's breakdown
    pub fn category(&self, category: Category) -> Option<&CategoryAnalysis> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Verify the arithmetic invariants of a payload (e.g. one received over
    /// the wire). Category budgets are not checked against tag budgets since
    /// they may be configured independently.
    pub fn check_consistency(&self) -> Result<()> {
        let mut total = Decimal::ZERO;
        let mut budget = Decimal::ZERO;

        for cat in &self.categories {
            let tag_total: Decimal = cat.tags.iter().map(|t| t.total).sum();
            if tag_total != cat.total {
                return Err(Error::InvalidData(format!(
                    "{} total {} does not match sum of tags {}",
                    cat.category, cat.total, tag_total
                )));
            }
            for tag in &cat.tags {
                if !cat.category.has_tag(&tag.tag) {
                    return Err(Error::InvalidData(format!(
                        "Tag {} does not belong to {}",
                        tag.tag, cat.category
                    )));
                }
            }
            total += cat.total;
            budget += cat.budget;
        }

        let summary = &self.summary;
        if summary.total_expenses != total {
            return Err(Error::InvalidData(format!(
                "Summary total {} does not match sum of categories {}",
                summary.total_expenses, total
            )));
        }
        if summary.total_budget != budget {
            return Err(Error::InvalidData(format!(
                "Summary budget {} does not match sum of categories {}",
                summary.total_budget, budget
            )));
        }
        if summary.difference != summary.total_budget - summary.total_expenses {
            return Err(Error::InvalidData(format!(
                "Summary difference {} is not budget minus expenses",
                summary.difference
            )));
        }
        Ok(())
    }
}

/// Analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Period {
    /// A calendar month; `month` is 1-12
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::Validation(format!("Year {} is out of range", year)));
        }
        Ok(Self::Month { year, month })
    }

    /// A calendar year
    pub fn year(year: i32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, 12, 31).is_none() {
            return Err(Error::Validation(format!("Year {} is out of range", year)));
        }
        Ok(Self::Year { year })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year { year } => date.year() == year,
        }
    }

    /// Inclusive first and last day of the period
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            Self::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                };
                let last = next.and_then(|d| d.pred_opt()).unwrap_or(NaiveDate::MAX);
                (first, last)
            }
            Self::Year { year } => (
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
                NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
            ),
        }
    }

    /// Number of months covered; monthly budgets are scaled by this
    pub fn months(&self) -> u32 {
        match self {
            Self::Month { .. } => 1,
            Self::Year { .. } => 12,
        }
    }

    /// Human label, e.g. "January 2024" or "Year 2024"
    pub fn label(&self) -> String {
        match *self {
            Self::Month { year, month } => {
                let name = MONTH_NAMES
                    .get(month.saturating_sub(1) as usize)
                    .copied()
                    .unwrap_or("Unknown");
                format!("{} {}", name, year)
            }
            Self::Year { year } => format!("Year {}", year),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Body of `POST /expenses/monthly-analysis`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthlyAnalysisRequest {
    pub month: u32,
    pub year: i32,
}

/// Body of `POST /expenses/yearly-analysis`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearlyAnalysisRequest {
    pub year: i32,
}

/// A configured monthly budget line
///
/// `tag == None` is a category-level budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub category: Category,
    pub tag: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Where a category's budget comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetMode {
    /// Category budget is the sum of its tag budgets
    #[default]
    Derived,
    /// Category budget is configured on its own
    Configured,
}

impl BudgetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Derived => "derived",
            Self::Configured => "configured",
        }
    }
}

impl std::str::FromStr for BudgetMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "derived" => Ok(Self::Derived),
            "configured" => Ok(Self::Configured),
            _ => Err(format!(
                "Unknown budget mode: {} (expected derived or configured)",
                s
            )),
        }
    }
}

impl std::fmt::Display for BudgetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
