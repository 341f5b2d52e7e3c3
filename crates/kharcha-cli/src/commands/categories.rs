//! Taxonomy listing

use anyhow::Result;
use kharcha_core::taxonomy::{self, Category};

pub fn cmd_categories(category: Option<&str>) -> Result<()> {
    match category {
        Some(name) => {
            let tags = taxonomy::tags_for(name)?;
            for tag in tags {
                println!("{}", tag);
            }
        }
        None => {
            println!();
            println!("🏷️  Categories");
            for category in Category::all() {
                println!();
                println!("   {}", category);
                for tag in category.tags() {
                    println!("     • {}", tag);
                }
            }
        }
    }
    Ok(())
}
