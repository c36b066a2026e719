//! JSON shapes exchanged between the POS clients and the server.
//!
//! Field casing follows what the existing clients already send: product and
//! audit payloads are snake_case rows, recipe, transfer and waste payloads
//! are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Successful response carrying a payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            count: None,
        }
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Response with only a status and a human readable message.
///
/// Also the body of every error response, with `success: false`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub message: String,
        pub timestamp: DateTime<Utc>,
        pub version: String,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
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
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Request body for creating a product.
    ///
    /// There is no `quantity` field: it always mirrors `inventory_b`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub firebase_id: String,
        pub name: String,
        pub category: String,
        pub price: Option<f64>,
        pub inventory_a: Option<f64>,
        pub inventory_b: Option<f64>,
        pub cost_per_unit: Option<f64>,
        pub unit: Option<String>,
        pub image_uri: Option<String>,
    }

    /// Partial update of the descriptive fields of a product.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductUpdate {
        pub name: Option<String>,
        pub category: Option<String>,
        pub price: Option<f64>,
        pub cost_per_unit: Option<f64>,
        pub unit: Option<String>,
        pub image_uri: Option<String>,
    }

    /// Stocktake body. At least one bucket must be present.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InventoryUpdate {
        #[serde(alias = "inventoryA")]
        pub inventory_a: Option<f64>,
        #[serde(alias = "inventoryB")]
        pub inventory_b: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferRequest {
        pub firebase_id: String,
        pub quantity: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferResponse {
        pub success: bool,
        pub message: String,
        pub new_inventory_a: f64,
        pub new_inventory_b: f64,
    }
}

pub mod recipe {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IngredientNew {
        pub ingredient_firebase_id: String,
        pub ingredient_name: String,
        pub quantity_needed: f64,
        pub unit: Option<String>,
    }

    /// Body of both recipe create and recipe update.
    ///
    /// The ingredient list replaces the stored one as a whole.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecipeWrite {
        pub product_firebase_id: String,
        pub product_name: String,
        pub product_number: Option<i32>,
        #[serde(default)]
        pub ingredients: Vec<IngredientNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IngredientView {
        pub id: String,
        pub ingredient_firebase_id: String,
        pub ingredient_name: String,
        pub quantity_needed: f64,
        pub unit: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecipeView {
        pub id: String,
        pub product_firebase_id: String,
        pub product_name: String,
        pub product_number: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub ingredients: Vec<IngredientView>,
        /// Servings the current prepared stock supports, when the recipe has
        /// ingredients.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub max_servings: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipeCreated {
        pub id: String,
    }
}

pub mod waste {
    use super::*;

    /// Query string of the waste ledger listing.
    ///
    /// Both bounds accept an RFC3339 timestamp or a plain `YYYY-MM-DD` date
    /// and are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WasteLogQuery {
        pub date_from: Option<String>,
        pub date_to: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WasteNew {
        pub product_firebase_id: String,
        pub product_name: Option<String>,
        pub category: Option<String>,
        pub quantity: f64,
        #[serde(default)]
        pub reason: Option<String>,
        pub recorded_by: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WasteRecorded {
        pub success: bool,
        pub message: String,
        pub new_inventory_b: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WasteLogView {
        pub id: Uuid,
        pub product_firebase_id: String,
        pub product_name: String,
        pub category: String,
        pub quantity: f64,
        pub reason: Option<String>,
        pub recorded_by: String,
        pub waste_date: DateTime<Utc>,
    }
}

pub mod audit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditNew {
        pub action: String,
        pub user_id: String,
        pub user_name: String,
        pub details: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditView {
        pub id: Uuid,
        pub action: String,
        pub user_id: String,
        pub user_name: String,
        pub details: String,
        pub timestamp: DateTime<Utc>,
    }
}
