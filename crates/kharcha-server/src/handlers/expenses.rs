//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{get_actor, AppError, AppState, MAX_PAGE_LIMIT};
use kharcha_core::models::{Expense, NewExpense, Period};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    pub year: Option<i32>,
    /// Requires `year`
    pub month: Option<u32>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Body of `POST /api/expenses`
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub tag: String,
}

fn query_period(params: &ExpenseQuery) -> Result<Option<Period>, AppError> {
    match (params.year, params.month) {
        (Some(year), Some(month)) => Ok(Some(Period::month(year, month)?)),
        (Some(year), None) => Ok(Some(Period::year(year)?)),
        (None, Some(_)) => Err(AppError::bad_request("month requires year")),
        (None, None) => Ok(None),
    }
}

/// GET /api/expenses - List expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let period = query_period(&params)?;

    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let expenses = state.db.list_expenses(period.as_ref(), limit, offset)?;
    let total = state.db.count_expenses(period.as_ref())?;

    state.db.log_audit(
        &get_actor(&headers),
        "list",
        Some("expense"),
        None,
        period.map(|p| p.label()).as_deref(),
    )?;

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        limit,
        offset,
    }))
}

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state
        .db
        .log_audit(&get_actor(&headers), "view", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let new_expense = NewExpense::parse(
        req.date,
        req.amount,
        &req.description,
        &req.category,
        &req.tag,
    )?;

    let expense = state.db.insert_expense(&new_expense)?;

    state.db.log_audit(
        &get_actor(&headers),
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("{}/{} {}", expense.category, expense.tag, expense.amount)),
    )?;

    Ok((StatusCode::CREATED, Json(expense)))
}
