//! Category/tag taxonomy
//!
//! The set of categories and the tags allowed under each one is fixed at build
//! time. Declaration order here is the order used everywhere else: analysis
//! output, the `/api/categories` listing and CLI tables.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level expense grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Fixed,
    Variable,
    Investment,
    Insurance,
    Miscellaneous,
}

const FIXED_TAGS: &[&str] = &[
    "RENT",
    "ELECTRICITY",
    "INTERNET",
    "COOK",
    "CLEANER",
    "DAIRY",
    "FURNITURE_RENT",
];

const VARIABLE_TAGS: &[&str] = &[
    "PETROL",
    "GROCERIES",
    "ZOMATO_BLINKIT_BIGBASKET",
    "CHAI_NASHTA",
    "SHOPPING",
    "DRY_FRUITS",
    "BIKE_WASH",
];

const INVESTMENT_TAGS: &[&str] = &["SIP_LONG_TERM", "SIP_SHORT_TERM"];

const INSURANCE_TAGS: &[&str] = &["TERM_LIFE"];

const MISCELLANEOUS_TAGS: &[&str] = &[
    "TRAIN_TICKET",
    "FLIGHT_TICKET",
    "CYLINDER",
    "GROOMING",
    "URBAN_CLAP",
    "SEND_ME",
    "UDHAR",
    "CUSTOM",
];

impl Category {
    /// All categories in declaration order
    pub fn all() -> &'static [Category] {
        &[
            Self::Fixed,
            Self::Variable,
            Self::Investment,
            Self::Insurance,
            Self::Miscellaneous,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "FIXED",
            Self::Variable => "VARIABLE",
            Self::Investment => "INVESTMENT",
            Self::Insurance => "INSURANCE",
            Self::Miscellaneous => "MISCELLANEOUS",
        }
    }

    /// Allowed tags for this category, in declaration order
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Self::Fixed => FIXED_TAGS,
            Self::Variable => VARIABLE_TAGS,
            Self::Investment => INVESTMENT_TAGS,
            Self::Insurance => INSURANCE_TAGS,
            Self::Miscellaneous => MISCELLANEOUS_TAGS,
        }
    }

    /// Position of `tag` in this category's list, if it belongs here
    pub fn tag_index(&self, tag: &str) -> Option<usize> {
        self.tags().iter().position(|t| *t == tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_index(tag).is_some()
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FIXED" => Ok(Self::Fixed),
            "VARIABLE" => Ok(Self::Variable),
            "INVESTMENT" => Ok(Self::Investment),
            "INSURANCE" => Ok(Self::Insurance),
            "MISCELLANEOUS" => Ok(Self::Miscellaneous),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All category names in declaration order
pub fn category_names() -> Vec<&'static str> {
    Category::all().iter().map(|c| c.as_str()).collect()
}

/// Tags for a category given by name
pub fn tags_for(category: &str) -> Result<&'static [&'static str]> {
    let category: Category = category.parse().map_err(Error::NotFound)?;
    Ok(category.tags())
}

/// Check that `tag` belongs to `category`
pub fn is_valid_tag(category: Category, tag: &str) -> bool {
    category.has_tag(tag)
}

/// Validate a (category, tag) pair from user input
///
/// Tags are matched case-insensitively and returned in canonical form.
pub fn validate_pair(category: &str, tag: &str) -> Result<(Category, &'static str)> {
    let category: Category = category.parse().map_err(Error::Validation)?;
    let wanted = tag.trim().to_uppercase();
    category
        .tags()
        .iter()
        .find(|t| **t == wanted)
        .map(|t| (category, *t))
        .ok_or_else(|| {
            Error::Validation(format!(
                "Tag {} is not valid for category {} (allowed: {})",
                tag,
                category,
                category.tags().join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        assert_eq!(
            category_names(),
            vec!["FIXED", "VARIABLE", "INVESTMENT", "INSURANCE", "MISCELLANEOUS"]
        );
    }

    #[test]
    fn test_tags_for_category() {
        let tags = tags_for("investment").unwrap();
        assert_eq!(tags, &["SIP_LONG_TERM", "SIP_SHORT_TERM"]);
        assert_eq!(Category::Fixed.tags()[0], "RENT");
        assert!(tags_for("TRAVEL").is_err());
    }

    #[test]
    fn test_validate_pair() {
        let (cat, tag) = validate_pair("variable", "groceries").unwrap();
        assert_eq!(cat, Category::Variable);
        assert_eq!(tag, "GROCERIES");

        // RENT belongs to FIXED, not VARIABLE
        let err = validate_pair("VARIABLE", "RENT").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(validate_pair("BOGUS", "RENT").is_err());
    }

    #[test]
    fn test_tag_sets_are_disjoint() {
        for a in Category::all() {
            for b in Category::all() {
                if a == b {
                    continue;
                }
                for tag in a.tags() {
                    assert!(!b.has_tag(tag), "{} appears under {} and {}", tag, a, b);
                }
            }
        }
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::Miscellaneous).unwrap();
        assert_eq!(json, "\"MISCELLANEOUS\"");
        let parsed: Category = serde_json::from_str("\"INSURANCE\"").unwrap();
        assert_eq!(parsed, Category::Insurance);
    }
}
