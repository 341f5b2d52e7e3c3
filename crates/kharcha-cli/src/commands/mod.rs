//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init, audit and shared utilities (open_db, load_settings, period parsing)
//! - `expenses` - Expense commands (add, list, import)
//! - `budget` - Budget management commands
//! - `reports` - Local spend-vs-budget reports and their text rendering
//! - `fetch` - Reports fetched from a running server
//! - `categories` - Taxonomy listing
//! - `serve` - Web server command

pub mod budget;
pub mod categories;
pub mod core;
pub mod expenses;
pub mod fetch;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use budget::*;
pub use categories::*;
pub use core::*;
pub use expenses::*;
pub use fetch::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
