//! Recipes API endpoints.

use api_types::{
    DataResponse, MessageResponse,
    recipe::{IngredientView, RecipeCreated, RecipeView, RecipeWrite},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{IngredientLine, Recipe, RecipeCmd, RecipeIngredient};

use crate::{
    ServerError, audit,
    server::{Actor, ServerState},
};

fn ingredient_view(line: RecipeIngredient) -> IngredientView {
    IngredientView {
        id: line.id,
        ingredient_firebase_id: line.ingredient_firebase_id,
        ingredient_name: line.ingredient_name,
        quantity_needed: line.quantity_needed,
        unit: line.unit,
    }
}

fn recipe_view(recipe: Recipe, max_servings: Option<u64>) -> RecipeView {
    RecipeView {
        id: recipe.id,
        product_firebase_id: recipe.product_firebase_id,
        product_name: recipe.product_name,
        product_number: recipe.product_number,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
        ingredients: recipe.ingredients.into_iter().map(ingredient_view).collect(),
        max_servings,
    }
}

fn recipe_cmd(payload: RecipeWrite) -> RecipeCmd {
    let mut cmd = RecipeCmd::new(payload.product_firebase_id, payload.product_name);
    if let Some(number) = payload.product_number {
        cmd = cmd.product_number(number);
    }
    cmd.ingredients(
        payload
            .ingredients
            .into_iter()
            .map(|ing| {
                let line = IngredientLine::new(
                    ing.ingredient_firebase_id,
                    ing.ingredient_name,
                    ing.quantity_needed,
                );
                match ing.unit {
                    Some(unit) => line.unit(unit),
                    None => line,
                }
            })
            .collect(),
    )
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<DataResponse<Vec<RecipeView>>>, ServerError> {
    let recipes = state.engine.recipes().await?;
    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let servings = state.engine.max_servings(&recipe).await?;
        views.push(recipe_view(recipe, servings));
    }
    let count = views.len();
    Ok(Json(DataResponse::new(views).count(count)))
}

pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<RecipeView>>, ServerError> {
    let Path(id) = id?;
    let recipe = state.engine.recipe(&id).await?;
    let servings = state.engine.max_servings(&recipe).await?;
    Ok(Json(DataResponse::new(recipe_view(recipe, servings))))
}

pub async fn ingredients(
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<Vec<IngredientView>>>, ServerError> {
    let Path(id) = id?;
    let lines: Vec<IngredientView> = state
        .engine
        .recipe_ingredients(&id)
        .await?
        .into_iter()
        .map(ingredient_view)
        .collect();
    let count = lines.len();
    Ok(Json(DataResponse::new(lines).count(count)))
}

pub async fn create(
    actor: Actor,
    State(state): State<ServerState>,
    payload: Result<Json<RecipeWrite>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<RecipeCreated>>), ServerError> {
    let Json(payload) = payload?;
    let product_name = payload.product_name.trim().to_string();
    let lines = payload.ingredients.len();

    let id = state.engine.create_recipe(recipe_cmd(payload)).await?;

    audit::record(
        &state,
        &actor,
        "Recipe Created",
        format!("Created recipe for {product_name} with {lines} ingredients"),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(
            DataResponse::new(RecipeCreated { id })
                .message(format!("Recipe for {product_name} created successfully")),
        ),
    ))
}

pub async fn update(
    actor: Actor,
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<RecipeWrite>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let product_name = payload.product_name.trim().to_string();
    let lines = payload.ingredients.len();

    state.engine.update_recipe(&id, recipe_cmd(payload)).await?;

    audit::record(
        &state,
        &actor,
        "Recipe Updated",
        format!("Updated recipe {id} for {product_name} with {lines} ingredients"),
    )
    .await;

    Ok(Json(MessageResponse::ok(format!(
        "Recipe for {product_name} updated successfully"
    ))))
}

pub async fn delete(
    actor: Actor,
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
    let Path(id) = id?;
    let recipe = state.engine.delete_recipe(&id).await?;

    audit::record(
        &state,
        &actor,
        "Recipe Deleted",
        format!("Deleted recipe for {}", recipe.product_name),
    )
    .await;

    Ok(Json(MessageResponse::ok(format!(
        "Recipe for {} deleted successfully",
        recipe.product_name
    ))))
}
