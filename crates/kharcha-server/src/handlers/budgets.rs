//! Budget handlers
//!
//! Amounts are monthly. Omitting `tag` addresses the category-level line.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{get_actor, AppError, AppState};
use kharcha_core::models::BudgetEntry;

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub category: String,
    pub tag: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBudgetRequest {
    pub category: String,
    pub tag: Option<String>,
}

fn budget_label(category: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{}/{}", category, tag),
        None => category.to_string(),
    }
}

/// GET /api/budgets - All budget lines
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BudgetEntry>>, AppError> {
    let budgets = state.db.list_budgets()?;
    state
        .db
        .log_audit(&get_actor(&headers), "list", Some("budget"), None, None)?;
    Ok(Json(budgets))
}

/// PUT /api/budgets - Set a budget line
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<SetBudgetRequest>, JsonRejection>,
) -> Result<Json<BudgetEntry>, AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let entry = state
        .db
        .set_budget(&req.category, req.tag.as_deref(), req.amount)?;

    state.db.log_audit(
        &get_actor(&headers),
        "update",
        Some("budget"),
        None,
        Some(&format!(
            "{}={}",
            budget_label(entry.category.as_str(), entry.tag.as_deref()),
            entry.amount
        )),
    )?;

    Ok(Json(entry))
}

/// DELETE /api/budgets - Remove a budget line
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<DeleteBudgetRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let removed = state
        .db
        .remove_budget(&req.category, req.tag.as_deref())?;
    if !removed {
        return Err(AppError::not_found("Budget not found"));
    }

    state.db.log_audit(
        &get_actor(&headers),
        "delete",
        Some("budget"),
        None,
        Some(&budget_label(&req.category, req.tag.as_deref())),
    )?;

    Ok(StatusCode::NO_CONTENT)
}
