//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kharcha_core::models::BudgetMode;
use rust_decimal::Decimal;

/// Kharcha - Track expenses against monthly budgets
#[derive(Parser)]
#[command(name = "kharcha")]
#[command(about = "Self-hosted expense tracker with spend-vs-budget analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "kharcha.db", env = "KHARCHA_DB", global = true)]
    pub db: PathBuf,

    /// Settings file (defaults to ~/.local/share/kharcha/config/kharcha.toml,
    /// then built-in defaults)
    #[arg(long, env = "KHARCHA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init {
        /// Also copy budgets declared in the settings file into the database
        #[arg(long)]
        load_budgets: bool,
    },

    /// Record an expense
    Add {
        /// Amount (positive)
        amount: Decimal,

        /// Category (FIXED, VARIABLE, INVESTMENT, INSURANCE, MISCELLANEOUS)
        category: String,

        /// Tag within the category (see `kharcha categories`)
        tag: String,

        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Date of the expense, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List recorded expenses
    List {
        /// Only expenses in this year
        #[arg(long)]
        year: Option<i32>,

        /// Only expenses in this month (1-12, requires --year)
        #[arg(long, requires = "year")]
        month: Option<u32>,

        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Import expenses from CSV (date,amount,description,category,tag)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Manage monthly budgets
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Spend-vs-budget report computed from the local database
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Fetch a spend-vs-budget report from a running server
    Fetch {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:3000", env = "KHARCHA_URL")]
        url: String,

        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month (1-12); omit for a yearly report
        #[arg(long)]
        month: Option<u32>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,

        /// Show the tag breakdown under each category
        #[arg(long)]
        tags: bool,
    },

    /// Show the category/tag taxonomy
    Categories {
        /// Only show tags of this category
        category: Option<String>,
    },

    /// Show recent audit log entries
    Audit {
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Only entries about this entity kind (expense, budget, analysis)
        #[arg(long)]
        entity: Option<String>,

        /// Only entries about this entity id
        #[arg(long, requires = "entity")]
        id: Option<i64>,

        /// Only entries by this actor (`api` includes every API client)
        #[arg(long)]
        actor: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origins (comma-separated)
        #[arg(long, env = "KHARCHA_ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,

        /// Category budget mode: derived or configured (overrides settings)
        #[arg(long)]
        budget_mode: Option<BudgetMode>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// List budget lines
    List,

    /// Set a monthly budget; omit the tag for a category-level budget
    Set {
        /// Category name
        category: String,

        /// Monthly amount
        amount: Decimal,

        /// Tag within the category
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Remove a budget line
    Remove {
        /// Category name
        category: String,

        /// Tag within the category (omit for the category-level line)
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Copy budgets from the settings file into the database
    Load,

    /// Delete all budget lines
    Clear,
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// One month (defaults to the current month)
    Monthly {
        /// Month (1-12)
        #[arg(long)]
        month: Option<u32>,

        /// Year
        #[arg(long)]
        year: Option<i32>,

        /// Category budget mode: derived or configured (overrides settings)
        #[arg(long)]
        budget_mode: Option<BudgetMode>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Show the tag breakdown under each category
        #[arg(long)]
        tags: bool,
    },

    /// One year (defaults to the current year)
    Yearly {
        /// Year
        #[arg(long)]
        year: Option<i32>,

        /// Category budget mode: derived or configured (overrides settings)
        #[arg(long)]
        budget_mode: Option<BudgetMode>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Show the tag breakdown under each category
        #[arg(long)]
        tags: bool,
    },
}
