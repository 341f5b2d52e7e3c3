//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analysis;
pub mod audit;
pub mod budgets;
pub mod categories;
pub mod expenses;

// Re-export all handlers for use in router
pub use analysis::*;
pub use audit::*;
pub use budgets::*;
pub use categories::*;
pub use expenses::*;
