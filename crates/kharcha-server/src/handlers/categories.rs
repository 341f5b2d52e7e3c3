//! Taxonomy handlers

use axum::{extract::Path, Json};
use serde::Serialize;

use crate::AppError;
use kharcha_core::taxonomy::{self, Category};

/// One category with its tags, in declaration order
#[derive(Serialize)]
pub struct CategoryTags {
    pub category: Category,
    pub tags: Vec<&'static str>,
}

/// GET /api/categories - The full taxonomy
pub async fn list_categories() -> Json<Vec<CategoryTags>> {
    let categories = Category::all()
        .iter()
        .map(|&category| CategoryTags {
            category,
            tags: category.tags().to_vec(),
        })
        .collect();
    Json(categories)
}

/// GET /api/categories/:category/tags - Tags of one category
pub async fn list_tags(Path(category): Path<String>) -> Result<Json<Vec<&'static str>>, AppError> {
    let tags = taxonomy::tags_for(&category)?;
    Ok(Json(tags.to_vec()))
}
