//! Spend-vs-budget analysis handlers
//!
//! Both endpoints answer 200 with an `AnalysisData` body, or 204 with no body
//! when the period has no expenses.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::{get_actor, AppError, AppState};
use kharcha_core::models::{MonthlyAnalysisRequest, Period, YearlyAnalysisRequest};

/// POST /api/expenses/monthly-analysis
pub async fn monthly_analysis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<MonthlyAnalysisRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;
    let period = Period::month(req.year, req.month)?;
    respond(&state, &headers, period, "monthly_analysis")
}

/// POST /api/expenses/yearly-analysis
pub async fn yearly_analysis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<YearlyAnalysisRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;
    let period = Period::year(req.year)?;
    respond(&state, &headers, period, "yearly_analysis")
}

fn respond(
    state: &AppState,
    headers: &HeaderMap,
    period: Period,
    action: &str,
) -> Result<Response, AppError> {
    let analysis = state.db.analyze_period(&period, state.config.budget_mode)?;

    state.db.log_audit(
        &get_actor(headers),
        action,
        Some("analysis"),
        None,
        Some(&period.label()),
    )?;

    match analysis {
        Some(data) => Ok(Json(data).into_response()),
        None => {
            debug!(period = %period, "No expenses in period");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}
