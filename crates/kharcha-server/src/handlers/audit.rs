//! Audit log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::{get_actor, AppError, AppState, MAX_PAGE_LIMIT};
use kharcha_core::{AuditEntry, AuditFilter};

/// Query parameters for audit log
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
    /// Entity kind: expense, budget, analysis, audit_log
    pub entity: Option<String>,
    pub entity_id: Option<i64>,
    pub actor: Option<String>,
}

fn default_audit_limit() -> i64 {
    100
}

/// GET /api/audit - List audit log entries
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    let filter = AuditFilter {
        entity_type: params.entity,
        entity_id: params.entity_id,
        actor: params.actor,
    };
    let entries = state.db.list_audit_log(limit, &filter)?;

    // Viewing the audit log is itself audited
    state.db.log_audit(
        &get_actor(&headers),
        "list",
        Some("audit_log"),
        None,
        Some(&format!("limit={}", limit)),
    )?;

    Ok(Json(entries))
}
