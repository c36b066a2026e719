use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    AuditCmd, AuditEntry, EngineError, ResultEngine, WasteLogEntry, audit_trail,
    util::{normalize_optional_text, normalize_required},
    waste_logs,
};

use super::Engine;

/// Date window for the waste ledger. Both bounds are inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WasteLogFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl WasteLogFilter {
    fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(EngineError::InvalidArgument(
                "date_from must be <= date_to".to_string(),
            ));
        }
        Ok(())
    }
}

impl Engine {
    /// List waste write-offs, newest first.
    pub async fn waste_logs(&self, filter: &WasteLogFilter) -> ResultEngine<Vec<WasteLogEntry>> {
        filter.validate()?;

        let mut query = waste_logs::Entity::find();
        if let Some(from) = filter.from {
            query = query.filter(waste_logs::Column::WasteDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(waste_logs::Column::WasteDate.lte(to));
        }
        let rows = query
            .order_by_desc(waste_logs::Column::WasteDate)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(WasteLogEntry::from).collect())
    }

    /// Append an entry to the audit trail.
    pub async fn record_audit(&self, cmd: AuditCmd) -> ResultEngine<AuditEntry> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            action: normalize_required(&cmd.action, "action")?,
            user_id: normalize_required(&cmd.user_id, "user id")?,
            user_name: normalize_required(&cmd.user_name, "user name")?,
            details: normalize_optional_text(cmd.details.as_deref()).unwrap_or_default(),
            timestamp: Utc::now(),
        };
        audit_trail::ActiveModel::from(&entry)
            .insert(&self.database)
            .await?;
        tracing::debug!("audit: {} by {}", entry.action, entry.user_id);
        Ok(entry)
    }
}
