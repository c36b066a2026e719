//! Audit trail endpoint and the best-effort logging used by other handlers.

use api_types::{
    DataResponse,
    audit::{AuditNew, AuditView},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{AuditCmd, AuditEntry};

use crate::{
    ServerError,
    server::{Actor, ServerState},
};

fn audit_view(entry: AuditEntry) -> AuditView {
    AuditView {
        id: entry.id,
        action: entry.action,
        user_id: entry.user_id,
        user_name: entry.user_name,
        details: entry.details,
        timestamp: entry.timestamp,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<AuditNew>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<AuditView>>), ServerError> {
    let Json(payload) = payload?;

    let mut cmd = AuditCmd::new(payload.action, payload.user_id, payload.user_name);
    if let Some(details) = payload.details {
        cmd = cmd.details(details);
    }
    let entry = state.engine.record_audit(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(audit_view(entry)).message("Audit log created")),
    ))
}

/// Append an audit entry after a successful mutation.
///
/// The mutation is already committed: a failure here is logged and
/// swallowed.
pub(crate) async fn record(state: &ServerState, actor: &Actor, action: &str, details: String) {
    let cmd = AuditCmd::new(action, actor.user_id.as_str(), actor.user_name.as_str())
        .details(details);
    if let Err(err) = state.engine.record_audit(cmd).await {
        tracing::warn!("failed to record audit entry \"{action}\": {err}");
    }
}
