//! Settings for Kharcha
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a layered resolution:
//! 1. An explicit path (`--config`), if it exists
//! 2. Override in data dir (~/.local/share/kharcha/config/kharcha.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! `KHARCHA_BUDGET_MODE` overrides `analysis.budget_mode` from whichever file
//! was used.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{BudgetEntry, BudgetMode};
use crate::taxonomy::{self, Category};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/kharcha.toml");

/// Environment variable overriding the budget mode
pub const BUDGET_MODE_ENV: &str = "KHARCHA_BUDGET_MODE";

/// Key used under `[budgets.<CATEGORY>]` for a category-level budget
pub const CATEGORY_BUDGET_KEY: &str = "_category";

/// Resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub budget_mode: BudgetMode,
    /// Currency symbol used when rendering amounts
    pub currency: String,
    /// Budgets declared in the file, validated against the taxonomy
    pub budgets: Vec<BudgetEntry>,
    /// File the settings were read from (None = embedded defaults)
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            budget_mode: BudgetMode::Derived,
            currency: "₹".to_string(),
            budgets: Vec::new(),
            source: None,
        }
    }
}

impl Settings {
    /// Load settings using the layered resolution, then apply env overrides
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut settings = load_file(override_path)?;

        if let Ok(mode) = std::env::var(BUDGET_MODE_ENV) {
            if !mode.trim().is_empty() {
                settings.budget_mode = mode.parse().map_err(Error::Config)?;
                debug!(mode = %settings.budget_mode, "Budget mode set from environment");
            }
        }

        Ok(settings)
    }

    /// Parse settings from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kharcha").join("config").join("kharcha.toml"))
}

fn load_file(override_path: Option<&Path>) -> Result<Settings> {
    let candidate = match override_path {
        Some(path) => {
            if !path.exists() {
                warn!(path = %path.display(), "Config file not found, using defaults");
            }
            Some(path.to_path_buf())
        }
        None => default_config_path(),
    };

    match candidate.filter(|p| p.exists()) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
            let mut settings = parse_config(&content)?;
            settings.source = Some(path);
            Ok(settings)
        }
        None => parse_config(DEFAULT_CONFIG),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
    display: Option<RawDisplay>,
    budgets: Option<BTreeMap<String, BTreeMap<String, Decimal>>>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    budget_mode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency: Option<String>,
}

fn parse_config(content: &str) -> Result<Settings> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut settings = Settings::default();

    if let Some(mode) = raw.analysis.and_then(|a| a.budget_mode) {
        settings.budget_mode = mode.parse().map_err(Error::Config)?;
    }

    if let Some(currency) = raw.display.and_then(|d| d.currency) {
        settings.currency = currency;
    }

    for (category_name, lines) in raw.budgets.unwrap_or_default() {
        let category: Category = category_name.parse().map_err(Error::Config)?;
        for (key, amount) in lines {
            if amount < Decimal::ZERO {
                return Err(Error::Config(format!(
                    "Budget for {}.{} must not be negative",
                    category_name, key
                )));
            }
            let tag = if key == CATEGORY_BUDGET_KEY {
                None
            } else {
                let (_, tag) = taxonomy::validate_pair(&category_name, &key)
                    .map_err(|e| Error::Config(e.to_string()))?;
                Some(tag.to_string())
            };
            settings.budgets.push(BudgetEntry {
                category,
                tag,
                amount,
            });
        }
    }

    Ok(settings)
}
