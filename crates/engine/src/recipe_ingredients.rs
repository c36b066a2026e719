//! Ingredient lines of a recipe.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Unit used when an ingredient line is submitted without one.
pub const DEFAULT_INGREDIENT_UNIT: &str = "g";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub recipe_id: String,
    /// Key of the product consumed by this line.
    pub ingredient_firebase_id: String,
    pub ingredient_name: String,
    pub quantity_needed: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub firebase_id: String,
    pub recipe_firebase_id: String,
    pub ingredient_firebase_id: String,
    pub ingredient_name: String,
    pub quantity_needed: f64,
    pub unit: String,
    /// Insertion order inside the recipe.
    pub position: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipes::Entity",
        from = "Column::RecipeFirebaseId",
        to = "super::recipes::Column::FirebaseId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Recipes,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn for_line(line: &RecipeIngredient, position: i32) -> Self {
        Self {
            firebase_id: ActiveValue::Set(line.id.clone()),
            recipe_firebase_id: ActiveValue::Set(line.recipe_id.clone()),
            ingredient_firebase_id: ActiveValue::Set(line.ingredient_firebase_id.clone()),
            ingredient_name: ActiveValue::Set(line.ingredient_name.clone()),
            quantity_needed: ActiveValue::Set(line.quantity_needed),
            unit: ActiveValue::Set(line.unit.clone()),
            position: ActiveValue::Set(position),
            created_at: ActiveValue::Set(line.created_at),
        }
    }
}

impl From<Model> for RecipeIngredient {
    fn from(model: Model) -> Self {
        Self {
            id: model.firebase_id,
            recipe_id: model.recipe_firebase_id,
            ingredient_firebase_id: model.ingredient_firebase_id,
            ingredient_name: model.ingredient_name,
            quantity_needed: model.quantity_needed,
            unit: model.unit,
            created_at: model.created_at,
        }
    }
}
