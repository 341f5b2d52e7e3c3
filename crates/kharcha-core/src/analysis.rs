//! Spend-vs-budget analysis
//!
//! `analyze` turns a set of expenses plus a budget plan into an
//! [`AnalysisData`] for one period. It is a pure function of its inputs:
//! output ordering follows taxonomy declaration order, so repeated calls over
//! unchanged data serialize identically.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AnalysisData, AnalysisSummary, BudgetEntry, BudgetMode, BudgetStatus, CategoryAnalysis,
    Expense, Period, TagAnalysis,
};
use crate::taxonomy::Category;

/// Classify spend against budget. Exact comparison, no tolerance band.
pub fn classify(spent: Decimal, budget: Decimal) -> BudgetStatus {
    match spent.cmp(&budget) {
        std::cmp::Ordering::Greater => BudgetStatus::Over,
        std::cmp::Ordering::Equal => BudgetStatus::On,
        std::cmp::Ordering::Less => BudgetStatus::Under,
    }
}

/// Monthly budget amounts keyed by tag and by category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetPlan {
    tags: HashMap<(Category, String), Decimal>,
    categories: HashMap<Category, Decimal>,
}

impl BudgetPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a BudgetEntry>) -> Self {
        let mut plan = Self::new();
        for entry in entries {
            match &entry.tag {
                Some(tag) => plan.set_tag(entry.category, tag, entry.amount),
                None => plan.set_category(entry.category, entry.amount),
            }
        }
        plan
    }

    pub fn set_tag(&mut self, category: Category, tag: &str, amount: Decimal) {
        self.tags.insert((category, tag.to_string()), amount);
    }

    pub fn set_category(&mut self, category: Category, amount: Decimal) {
        self.categories.insert(category, amount);
    }

    /// Monthly budget for a tag (zero when unconfigured)
    pub fn tag_budget(&self, category: Category, tag: &str) -> Decimal {
        self.tags
            .get(&(category, tag.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Monthly category-level budget, if one was configured
    pub fn category_budget(&self, category: Category) -> Option<Decimal> {
        self.categories.get(&category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.categories.is_empty()
    }

    /// Flatten back into entries, in taxonomy order (category line first)
    pub fn entries(&self) -> Vec<BudgetEntry> {
        let mut out = Vec::new();
        for &category in Category::all() {
            if let Some(amount) = self.category_budget(category) {
                out.push(BudgetEntry {
                    category,
                    tag: None,
                    amount,
                });
            }
            for tag in category.tags() {
                if let Some(amount) = self.tags.get(&(category, tag.to_string())) {
                    out.push(BudgetEntry {
                        category,
                        tag: Some(tag.to_string()),
                        amount: *amount,
                    });
                }
            }
        }
        out
    }
}

/// Build the analysis for `period`
///
/// Returns `None` when no countable expense falls inside the period, so callers
/// can tell "no activity" apart from activity that nets to zero. Expenses whose
/// tag is outside their category are skipped and do not count as activity.
pub fn analyze(
    expenses: &[Expense],
    period: &Period,
    plan: &BudgetPlan,
    mode: BudgetMode,
) -> Option<AnalysisData> {
    // (category, tag position) -> spend
    let mut spent: BTreeMap<(Category, usize), Decimal> = BTreeMap::new();
    let mut matched = 0usize;

    for expense in expenses.iter().filter(|e| period.contains(e.date)) {
        match expense.category.tag_index(&expense.tag) {
            Some(idx) => {
                matched += 1;
                *spent.entry((expense.category, idx)).or_insert(Decimal::ZERO) += expense.amount;
            }
            None => {
                warn!(
                    expense_id = expense.id,
                    category = %expense.category,
                    tag = %expense.tag,
                    "Skipping expense with tag outside its category"
                );
            }
        }
    }

    if matched == 0 {
        debug!(period = %period, "No expenses in period");
        return None;
    }

    let scale = Decimal::from(period.months());
    let mut categories = Vec::new();

    for &category in Category::all() {
        let mut tags = Vec::new();
        for (idx, tag) in category.tags().iter().enumerate() {
            let total = spent.get(&(category, idx)).copied();
            let budget = plan.tag_budget(category, tag) * scale;
            if total.is_none() && budget <= Decimal::ZERO {
                continue;
            }
            let total = total.unwrap_or(Decimal::ZERO);
            tags.push(TagAnalysis {
                tag: tag.to_string(),
                total,
                budget,
                status: classify(total, budget),
            });
        }

        let total: Decimal = tags.iter().map(|t| t.total).sum();
        let tag_budget: Decimal = tags.iter().map(|t| t.budget).sum();
        let budget = match mode {
            BudgetMode::Derived => tag_budget,
            BudgetMode::Configured => plan
                .category_budget(category)
                .map(|b| b * scale)
                .unwrap_or(tag_budget),
        };

        if tags.is_empty() && budget <= Decimal::ZERO {
            continue;
        }

        categories.push(CategoryAnalysis {
            category,
            total,
            budget,
            status: classify(total, budget),
            tags,
        });
    }

    let total_expenses: Decimal = categories.iter().map(|c| c.total).sum();
    let total_budget: Decimal = categories.iter().map(|c| c.budget).sum();

    Some(AnalysisData {
        summary: AnalysisSummary {
            total_expenses,
            total_budget,
            difference: total_budget - total_expenses,
            status: classify(total_expenses, total_budget),
        },
        categories,
    })
}
