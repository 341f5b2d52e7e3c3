//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use kharcha_core::models::BudgetMode;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
    budget_mode: BudgetMode,
) -> Result<()> {
    println!("🚀 Starting Kharcha web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Budget mode: {}", budget_mode);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = kharcha_server::ServerConfig {
        allowed_origins,
        budget_mode,
    };

    let static_dir_str = static_dir
        .map(|p| {
            p.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", p.display()))
        })
        .transpose()?;
    kharcha_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
