//! Report command implementations
//!
//! Rendering is split from printing so the text output can be tested.

use anyhow::Result;
use kharcha_core::config::Settings;
use kharcha_core::db::Database;
use kharcha_core::models::{AnalysisData, BudgetMode, BudgetStatus, Period};
use rust_decimal::Decimal;

pub fn cmd_report(
    db: &Database,
    period: &Period,
    mode: BudgetMode,
    settings: &Settings,
    json: bool,
    show_tags: bool,
) -> Result<()> {
    let analysis = db.analyze_period(period, mode)?;
    print_analysis(analysis.as_ref(), period, &settings.currency, json, show_tags)
}

/// Print an analysis (or the no-data message) as tables or JSON
pub fn print_analysis(
    analysis: Option<&AnalysisData>,
    period: &Period,
    currency: &str,
    json: bool,
    show_tags: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print!("{}", render_report(analysis, period, currency, show_tags));
    Ok(())
}

/// Table view, or the no-data message when nothing would be listed
pub fn render_report(
    analysis: Option<&AnalysisData>,
    period: &Period,
    currency: &str,
    show_tags: bool,
) -> String {
    match analysis {
        Some(data) if !data.categories.is_empty() => {
            render_analysis(data, period, currency, show_tags)
        }
        _ => render_no_data(period),
    }
}

/// Shown when a period has no expenses
pub fn render_no_data(period: &Period) -> String {
    format!(
        "\nNo Data Available\nThere is no expense data for {}.\n",
        period.label()
    )
}

/// Summary, category table (optionally with tags) and the over-budget list
pub fn render_analysis(
    data: &AnalysisData,
    period: &Period,
    currency: &str,
    show_tags: bool,
) -> String {
    let mut lines = vec![
        String::new(),
        format!("📊 Budget Analysis · {}", period.label()),
        "   ─────────────────────────────────────────────────────────────".to_string(),
    ];

    let summary = &data.summary;
    lines.push(format!(
        "   Total Expenses:  {}",
        format_amount(currency, summary.total_expenses)
    ));
    lines.push(format!(
        "   Total Budget:    {}",
        format_amount(currency, summary.total_budget)
    ));
    lines.push(format!(
        "   Difference:      {}",
        format_amount(currency, summary.difference)
    ));
    lines.push(format!("   Status:          {}", status_label(summary.status)));
    lines.push(String::new());

    lines.push(format!(
        "   {:24} │ {:>14} │ {:>14} │ {:>14} │ Status",
        "Category", "Spent", "Budget", "Difference"
    ));
    lines.push(
        "   ─────────────────────────┼────────────────┼────────────────┼────────────────┼──────────"
            .to_string(),
    );

    for category in &data.categories {
        lines.push(format!(
            "   {:24} │ {:>14} │ {:>14} │ {:>14} │ {}",
            category.category.as_str(),
            format_amount(currency, category.total),
            format_amount(currency, category.budget),
            format_amount(currency, category.budget - category.total),
            status_label(category.status)
        ));
        if show_tags {
            for tag in &category.tags {
                lines.push(format!(
                    "   {:24} │ {:>14} │ {:>14} │ {:>14} │ {}",
                    format!("  {}", tag.tag),
                    format_amount(currency, tag.total),
                    format_amount(currency, tag.budget),
                    format_amount(currency, tag.budget - tag.total),
                    status_label(tag.status)
                ));
            }
        }
    }

    let over: Vec<_> = data.over_budget_categories().collect();
    if !over.is_empty() {
        lines.push(String::new());
        lines.push("   ⚠️  Over budget:".to_string());
        for category in over {
            lines.push(format!(
                "     • {}: {} spent of {} ({} over)",
                category.category,
                format_amount(currency, category.total),
                format_amount(currency, category.budget),
                format_amount(currency, category.total - category.budget)
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

pub fn status_label(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::Over => "🔴 OVER",
        BudgetStatus::On => "🟡 ON",
        BudgetStatus::Under => "🟢 UNDER",
    }
}

/// Format money with two decimals and thousands separators, e.g. `-₹1,250.50`
pub fn format_amount(currency: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}{}{}.{}", sign, currency, group_thousands(whole), fraction)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
