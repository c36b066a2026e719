//! Append-only audit trail.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub user_id: String,
    pub user_name: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_trail")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub action: String,
    pub user_id: String,
    pub user_name: String,
    pub details: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&AuditEntry> for ActiveModel {
    fn from(value: &AuditEntry) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            action: ActiveValue::Set(value.action.clone()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            user_name: ActiveValue::Set(value.user_name.clone()),
            details: ActiveValue::Set(value.details.clone()),
            timestamp: ActiveValue::Set(value.timestamp),
        }
    }
}
