//! Recipe replacement.
//!
//! A recipe and its ingredient rows are always written together. Create
//! inserts the recipe then every line; update rewrites the scalar fields,
//! deletes every existing line and inserts the new set; delete removes the
//! lines before the recipe row so no ingredient is ever left without its
//! parent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    DEFAULT_INGREDIENT_UNIT, EngineError, IngredientLine, Recipe, RecipeCmd, RecipeIngredient,
    ResultEngine, products, recipe_ingredients, recipes,
    util::{new_ingredient_id, new_recipe_id, normalize_optional_text, normalize_required},
};

use super::Engine;

/// Recipe fields after validation.
struct RecipeInput {
    product_id: String,
    product_name: String,
    product_number: i32,
    ingredients: Vec<ValidIngredient>,
}

struct ValidIngredient {
    ingredient_firebase_id: String,
    ingredient_name: String,
    quantity_needed: f64,
    unit: String,
}

fn validate_ingredient(line: IngredientLine) -> ResultEngine<ValidIngredient> {
    let quantity_needed = line.quantity_needed;
    if !quantity_needed.is_finite() || quantity_needed <= 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "quantity needed for '{}' must be greater than 0",
            line.ingredient_name.trim()
        )));
    }
    Ok(ValidIngredient {
        ingredient_firebase_id: normalize_required(&line.ingredient_firebase_id, "ingredient id")?,
        ingredient_name: normalize_required(&line.ingredient_name, "ingredient name")?,
        quantity_needed,
        unit: normalize_optional_text(line.unit.as_deref())
            .unwrap_or_else(|| DEFAULT_INGREDIENT_UNIT.to_string()),
    })
}

fn validate_recipe(cmd: RecipeCmd) -> ResultEngine<RecipeInput> {
    Ok(RecipeInput {
        product_id: normalize_required(&cmd.product_id, "product id")?,
        product_name: normalize_required(&cmd.product_name, "product name")?,
        product_number: cmd.product_number.unwrap_or(0),
        ingredients: cmd
            .ingredients
            .into_iter()
            .map(validate_ingredient)
            .collect::<ResultEngine<Vec<_>>>()?,
    })
}

impl Engine {
    /// Create a recipe with its full ingredient set.
    ///
    /// At least one ingredient is required. Returns the generated recipe key.
    pub async fn create_recipe(&self, cmd: RecipeCmd) -> ResultEngine<String> {
        if cmd.ingredients.is_empty() {
            return Err(EngineError::InvalidArgument(
                "at least one ingredient is required".to_string(),
            ));
        }
        let input = validate_recipe(cmd)?;

        let recipe_id = self
            .with_tx(|engine, db_tx| Box::pin(engine.insert_recipe(db_tx, input)))
            .await?;
        tracing::debug!("created recipe {recipe_id}");
        Ok(recipe_id)
    }

    async fn insert_recipe(
        &self,
        db_tx: &DatabaseTransaction,
        input: RecipeInput,
    ) -> ResultEngine<String> {
        self.require_product(db_tx, &input.product_id).await?;

        let now = Utc::now();
        let recipe = Recipe {
            id: new_recipe_id(),
            product_firebase_id: input.product_id,
            product_name: input.product_name,
            product_number: input.product_number,
            created_at: now,
            updated_at: now,
            ingredients: Vec::new(),
        };
        recipes::ActiveModel::from(&recipe).insert(db_tx).await?;

        insert_ingredients(db_tx, &recipe.id, input.ingredients, now).await?;
        Ok(recipe.id)
    }

    /// Replace a recipe's scalar fields and its whole ingredient set.
    ///
    /// Unlike create, an empty ingredient list is accepted and clears the
    /// recipe. No line of the previous set survives.
    pub async fn update_recipe(&self, recipe_id: &str, cmd: RecipeCmd) -> ResultEngine<()> {
        let recipe_id = normalize_required(recipe_id, "recipe id")?;
        let input = validate_recipe(cmd)?;

        self.with_tx(|engine, db_tx| Box::pin(engine.replace_recipe(db_tx, recipe_id, input)))
            .await?;
        Ok(())
    }

    async fn replace_recipe(
        &self,
        db_tx: &DatabaseTransaction,
        recipe_id: String,
        input: RecipeInput,
    ) -> ResultEngine<()> {
        require_recipe(db_tx, &recipe_id).await?;
        self.require_product(db_tx, &input.product_id).await?;

        let now = Utc::now();
        let recipe = recipes::ActiveModel {
            firebase_id: ActiveValue::Unchanged(recipe_id.clone()),
            product_firebase_id: ActiveValue::Set(input.product_id),
            product_name: ActiveValue::Set(input.product_name),
            product_number: ActiveValue::Set(input.product_number),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        recipe.update(db_tx).await?;

        recipe_ingredients::Entity::delete_many()
            .filter(recipe_ingredients::Column::RecipeFirebaseId.eq(recipe_id.as_str()))
            .exec(db_tx)
            .await?;
        insert_ingredients(db_tx, &recipe_id, input.ingredients, now).await?;

        tracing::debug!("replaced ingredients of recipe {recipe_id}");
        Ok(())
    }

    /// Delete a recipe together with all of its ingredient rows.
    pub async fn delete_recipe(&self, recipe_id: &str) -> ResultEngine<Recipe> {
        let recipe_id = normalize_required(recipe_id, "recipe id")?;
        self.with_tx(|engine, db_tx| Box::pin(engine.remove_recipe(db_tx, recipe_id)))
            .await
    }

    async fn remove_recipe(
        &self,
        db_tx: &DatabaseTransaction,
        recipe_id: String,
    ) -> ResultEngine<Recipe> {
        let model = require_recipe(db_tx, &recipe_id).await?;

        recipe_ingredients::Entity::delete_many()
            .filter(recipe_ingredients::Column::RecipeFirebaseId.eq(recipe_id.as_str()))
            .exec(db_tx)
            .await?;
        recipes::Entity::delete_by_id(recipe_id).exec(db_tx).await?;

        Ok(Recipe::from_parts(model, Vec::new()))
    }

    /// Return a recipe with its ingredients.
    pub async fn recipe(&self, recipe_id: &str) -> ResultEngine<Recipe> {
        let model = recipes::Entity::find_by_id(recipe_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("recipe {recipe_id}")))?;
        let ingredients = self.recipe_ingredients(recipe_id).await?;
        Ok(Recipe::from_parts(model, ingredients))
    }

    /// Return every recipe with its ingredients, ordered by product name.
    pub async fn recipes(&self) -> ResultEngine<Vec<Recipe>> {
        let models = recipes::Entity::find()
            .order_by_asc(recipes::Column::ProductName)
            .all(&self.database)
            .await?;
        let ids: Vec<String> = models.iter().map(|m| m.firebase_id.clone()).collect();

        let mut lines_by_recipe: HashMap<String, Vec<RecipeIngredient>> = HashMap::new();
        let lines = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeFirebaseId.is_in(ids))
            .order_by_asc(recipe_ingredients::Column::Position)
            .all(&self.database)
            .await?;
        for line in lines {
            lines_by_recipe
                .entry(line.recipe_firebase_id.clone())
                .or_default()
                .push(line.into());
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let ingredients = lines_by_recipe
                    .remove(&model.firebase_id)
                    .unwrap_or_default();
                Recipe::from_parts(model, ingredients)
            })
            .collect())
    }

    /// Return the ingredient lines of a recipe in insertion order.
    ///
    /// An unknown (or deleted) recipe simply has no lines.
    pub async fn recipe_ingredients(&self, recipe_id: &str) -> ResultEngine<Vec<RecipeIngredient>> {
        let lines = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeFirebaseId.eq(recipe_id))
            .order_by_asc(recipe_ingredients::Column::Position)
            .all(&self.database)
            .await?;
        Ok(lines.into_iter().map(RecipeIngredient::from).collect())
    }

    /// How many servings of `recipe` the current bucket B stock supports.
    ///
    /// `None` for a recipe without ingredients. A line whose product no
    /// longer exists counts as zero stock.
    pub async fn max_servings(&self, recipe: &Recipe) -> ResultEngine<Option<u64>> {
        if recipe.ingredients.is_empty() {
            return Ok(None);
        }
        let ids: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|line| line.ingredient_firebase_id.clone())
            .collect();
        let stock: HashMap<String, f64> = products::Entity::find()
            .filter(products::Column::FirebaseId.is_in(ids))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|p| (p.firebase_id, p.inventory_b))
            .collect();

        let servings = recipe
            .ingredients
            .iter()
            .map(|line| {
                let available = stock
                    .get(&line.ingredient_firebase_id)
                    .copied()
                    .unwrap_or(0.0);
                (available / line.quantity_needed).floor().max(0.0) as u64
            })
            .min();
        Ok(servings)
    }
}

async fn require_recipe(db_tx: &DatabaseTransaction, recipe_id: &str) -> ResultEngine<recipes::Model> {
    recipes::Entity::find_by_id(recipe_id.to_string())
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("recipe {recipe_id}")))
}

async fn insert_ingredients(
    db_tx: &DatabaseTransaction,
    recipe_id: &str,
    lines: Vec<ValidIngredient>,
    created_at: DateTime<Utc>,
) -> ResultEngine<()> {
    for (position, line) in lines.into_iter().enumerate() {
        let row = RecipeIngredient {
            id: new_ingredient_id(),
            recipe_id: recipe_id.to_string(),
            ingredient_firebase_id: line.ingredient_firebase_id,
            ingredient_name: line.ingredient_name,
            quantity_needed: line.quantity_needed,
            unit: line.unit,
            created_at,
        };
        let position = i32::try_from(position).map_err(|_| {
            EngineError::InvalidArgument("too many ingredient lines".to_string())
        })?;
        recipe_ingredients::ActiveModel::for_line(&row, position)
            .insert(db_tx)
            .await?;
    }
    Ok(())
}
