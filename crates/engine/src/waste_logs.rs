//! Append-only waste write-offs.
//!
//! Rows are only created by [`Engine::waste_deduct`](crate::Engine::waste_deduct),
//! in the same atomic unit that lowers the product's bucket B.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recorder used when a write-off does not name one.
pub const DEFAULT_RECORDER: &str = "system";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WasteLogEntry {
    pub id: Uuid,
    pub product_firebase_id: String,
    pub product_name: String,
    pub category: String,
    pub quantity: f64,
    pub reason: Option<String>,
    pub recorded_by: String,
    pub waste_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "waste_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_firebase_id: String,
    pub product_name: String,
    pub category: String,
    pub quantity: f64,
    pub reason: Option<String>,
    pub recorded_by: String,
    pub waste_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WasteLogEntry> for ActiveModel {
    fn from(value: &WasteLogEntry) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            product_firebase_id: ActiveValue::Set(value.product_firebase_id.clone()),
            product_name: ActiveValue::Set(value.product_name.clone()),
            category: ActiveValue::Set(value.category.clone()),
            quantity: ActiveValue::Set(value.quantity),
            reason: ActiveValue::Set(value.reason.clone()),
            recorded_by: ActiveValue::Set(value.recorded_by.clone()),
            waste_date: ActiveValue::Set(value.waste_date),
        }
    }
}

impl From<Model> for WasteLogEntry {
    fn from(model: Model) -> Self {
        Self {
            // Rows are always written by the engine with a v4 id.
            id: Uuid::parse_str(&model.id).unwrap_or_default(),
            product_firebase_id: model.product_firebase_id,
            product_name: model.product_name,
            category: model.category,
            quantity: model.quantity,
            reason: model.reason,
            recorded_by: model.recorded_by,
            waste_date: model.waste_date,
        }
    }
}
