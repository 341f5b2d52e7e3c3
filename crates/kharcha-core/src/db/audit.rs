//! Audit log operations
//!
//! Every mutation and every analysis request leaves a row here. Actors are
//! plain strings: `cli` for the command line, `api` or `api:<user-agent>` for
//! HTTP callers.

use rusqlite::{params, Row};

use super::{AuditEntry, Database};
use crate::error::Result;

/// Narrows an audit listing; empty fields match everything
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AuditFilter {
    /// Entity kind, e.g. `expense`, `budget`, `analysis`
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    /// `api` matches `api` and every `api:<user-agent>`
    pub actor: Option<String>,
}

impl AuditFilter {
    pub fn entity(entity_type: &str, entity_id: Option<i64>) -> Self {
        Self {
            entity_type: Some(entity_type.to_string()),
            entity_id,
            actor: None,
        }
    }
}

fn audit_from_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        actor: row.get(2)?,
        action: row.get(3)?,
        entity_type: row.get(4)?,
        entity_id: row.get(5)?,
        details: row.get(6)?,
    })
}

impl Database {
    /// Record who did what to which entity; returns the new row id
    pub fn log_audit(
        &self,
        actor: &str,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        details: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_log (actor, action, entity_type, entity_id, details) VALUES (?, ?, ?, ?, ?)",
            params![actor, action, entity_type, entity_id, details],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Newest entries first, narrowed by `filter`
    pub fn list_audit_log(&self, limit: i64, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            r#"
            SELECT id, timestamp, actor, action, entity_type, entity_id, details
            FROM audit_log
            WHERE 1=1
            "#,
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(kind) = &filter.entity_type {
            sql.push_str(" AND entity_type = ?");
            params_vec.push(Box::new(kind.clone()));
        }
        if let Some(id) = filter.entity_id {
            sql.push_str(" AND entity_id = ?");
            params_vec.push(Box::new(id));
        }
        if let Some(actor) = &filter.actor {
            sql.push_str(" AND (actor = ? OR actor LIKE ? || ':%')");
            params_vec.push(Box::new(actor.clone()));
            params_vec.push(Box::new(actor.clone()));
        }

        // Timestamps have one-second resolution; id breaks ties
        sql.push_str(" ORDER BY timestamp DESC, id DESC LIMIT ?");
        params_vec.push(Box::new(limit));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_refs.as_slice(), audit_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
