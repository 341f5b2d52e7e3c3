//! Kharcha CLI - Expense tracker with monthly budgets
//!
//! Usage:
//!   kharcha init                               Initialize database
//!   kharcha add 450 VARIABLE PETROL -d Fuel    Record an expense
//!   kharcha import --file expenses.csv         Import expenses
//!   kharcha report monthly --month 1           Spend vs budget for a month
//!   kharcha serve --port 3000                  Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use kharcha_core::AuditFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { load_budgets } => commands::cmd_init(&cli.db, &settings, load_budgets),
        Commands::Add {
            amount,
            category,
            tag,
            description,
            date,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(&db, amount, &category, &tag, &description, date, &settings)
        }
        Commands::List { year, month, limit } => {
            let db = commands::open_db(&cli.db)?;
            let period = commands::optional_period(year, month)?;
            commands::cmd_list(&db, period.as_ref(), limit, &settings)
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(BudgetAction::List) => commands::cmd_budget_list(&db, &settings),
                Some(BudgetAction::Set {
                    category,
                    amount,
                    tag,
                }) => commands::cmd_budget_set(&db, &category, tag.as_deref(), amount, &settings),
                Some(BudgetAction::Remove { category, tag }) => {
                    commands::cmd_budget_remove(&db, &category, tag.as_deref())
                }
                Some(BudgetAction::Load) => commands::cmd_budget_load(&db, &settings),
                Some(BudgetAction::Clear) => commands::cmd_budget_clear(&db),
            }
        }
        Commands::Report { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                ReportAction::Monthly {
                    month,
                    year,
                    budget_mode,
                    json,
                    tags,
                } => {
                    let period = commands::month_period(year, month)?;
                    let mode = budget_mode.unwrap_or(settings.budget_mode);
                    commands::cmd_report(&db, &period, mode, &settings, json, tags)
                }
                ReportAction::Yearly {
                    year,
                    budget_mode,
                    json,
                    tags,
                } => {
                    let period = commands::year_period(year)?;
                    let mode = budget_mode.unwrap_or(settings.budget_mode);
                    commands::cmd_report(&db, &period, mode, &settings, json, tags)
                }
            }
        }
        Commands::Fetch {
            url,
            year,
            month,
            json,
            tags,
        } => {
            let period = match month {
                Some(month) => commands::month_period(year, Some(month))?,
                None => commands::year_period(year)?,
            };
            commands::cmd_fetch(&url, period, &settings, json, tags).await
        }
        Commands::Categories { category } => commands::cmd_categories(category.as_deref()),
        Commands::Audit {
            limit,
            entity,
            id,
            actor,
        } => {
            let db = commands::open_db(&cli.db)?;
            let filter = AuditFilter {
                entity_type: entity,
                entity_id: id,
                actor,
            };
            commands::cmd_audit(&db, limit, &filter)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
            budget_mode,
        } => {
            let mode = budget_mode.unwrap_or(settings.budget_mode);
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                static_dir.as_deref(),
                allowed_origins,
                mode,
            )
            .await
        }
    }
}
