//! Recipes and their ingredient lines.
//!
//! A recipe belongs to exactly one product and owns its ingredient rows
//! (see [`RecipeIngredient`](crate::RecipeIngredient)). The ingredient set
//! is only ever replaced as a whole, inside the same atomic unit that touches
//! the recipe row.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::RecipeIngredient;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub product_firebase_id: String,
    pub product_name: String,
    pub product_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ingredient lines in insertion order.
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub(crate) fn from_parts(model: Model, ingredients: Vec<RecipeIngredient>) -> Self {
        Self {
            id: model.firebase_id,
            product_firebase_id: model.product_firebase_id,
            product_name: model.product_name,
            product_number: model.product_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
            ingredients,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub firebase_id: String,
    pub product_firebase_id: String,
    pub product_name: String,
    pub product_number: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    Ingredients,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductFirebaseId",
        to = "super::products::Column::FirebaseId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Recipe> for ActiveModel {
    fn from(value: &Recipe) -> Self {
        Self {
            firebase_id: ActiveValue::Set(value.id.clone()),
            product_firebase_id: ActiveValue::Set(value.product_firebase_id.clone()),
            product_name: ActiveValue::Set(value.product_name.clone()),
            product_number: ActiveValue::Set(value.product_number),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
