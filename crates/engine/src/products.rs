//! Stocked products.
//!
//! A product holds two independent stock buckets:
//! - `inventory_a`: raw/bulk stock
//! - `inventory_b`: prepared/retail stock
//!
//! The legacy `quantity` column mirrors `inventory_b`. It is never written on
//! its own: every write that touches bucket B rewrites it from the new value.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Unit used when a product is created without one.
pub const DEFAULT_PRODUCT_UNIT: &str = "pcs";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable key assigned by the caller (the POS client), never regenerated.
    pub firebase_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Mirror of `inventory_b`, kept for older clients.
    pub quantity: f64,
    pub inventory_a: f64,
    pub inventory_b: f64,
    pub cost_per_unit: f64,
    pub unit: String,
    pub image_uri: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn stock(&self) -> Stock {
        Stock {
            inventory_a: self.inventory_a,
            inventory_b: self.inventory_b,
        }
    }
}

/// Snapshot of both buckets of a product.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub inventory_a: f64,
    pub inventory_b: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub firebase_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: f64,
    pub inventory_a: f64,
    pub inventory_b: f64,
    pub cost_per_unit: f64,
    pub unit: String,
    pub image_uri: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipes::Entity")]
    Recipes,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            firebase_id: ActiveValue::Set(value.firebase_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            category: ActiveValue::Set(value.category.clone()),
            price: ActiveValue::Set(value.price),
            quantity: ActiveValue::Set(value.inventory_b),
            inventory_a: ActiveValue::Set(value.inventory_a),
            inventory_b: ActiveValue::Set(value.inventory_b),
            cost_per_unit: ActiveValue::Set(value.cost_per_unit),
            unit: ActiveValue::Set(value.unit.clone()),
            image_uri: ActiveValue::Set(value.image_uri.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            firebase_id: model.firebase_id,
            name: model.name,
            category: model.category,
            price: model.price,
            quantity: model.quantity,
            inventory_a: model.inventory_a,
            inventory_b: model.inventory_b,
            cost_per_unit: model.cost_per_unit,
            unit: model.unit,
            image_uri: model.image_uri,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
