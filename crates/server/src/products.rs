//! Products API endpoints.

use api_types::{
    DataResponse, MessageResponse,
    product::{
        InventoryUpdate, ProductNew, ProductUpdate, ProductView, TransferRequest,
        TransferResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{NewProduct, Product, ProductPatch, SetInventoryCmd, TransferCmd};

use crate::{
    ServerError, audit,
    server::{Actor, ServerState},
};

pub(crate) fn product_view(product: Product) -> ProductView {
    ProductView {
        firebase_id: product.firebase_id,
        name: product.name,
        category: product.category,
        price: product.price,
        quantity: product.quantity,
        inventory_a: product.inventory_a,
        inventory_b: product.inventory_b,
        cost_per_unit: product.cost_per_unit,
        unit: product.unit,
        image_uri: product.image_uri,
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<DataResponse<Vec<ProductView>>>, ServerError> {
    let products: Vec<ProductView> = state
        .engine
        .products()
        .await?
        .into_iter()
        .map(product_view)
        .collect();
    let count = products.len();
    Ok(Json(DataResponse::new(products).count(count)))
}

pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<ProductView>>, ServerError> {
    let Path(id) = id?;
    let product = state.engine.product(&id).await?;
    Ok(Json(DataResponse::new(product_view(product))))
}

pub async fn create(
    actor: Actor,
    State(state): State<ServerState>,
    payload: Result<Json<ProductNew>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<ProductView>>), ServerError> {
    let Json(payload) = payload?;

    let mut new = NewProduct::new(payload.firebase_id, payload.name, payload.category)
        .price(payload.price.unwrap_or(0.0))
        .stock(
            payload.inventory_a.unwrap_or(0.0),
            payload.inventory_b.unwrap_or(0.0),
        )
        .cost_per_unit(payload.cost_per_unit.unwrap_or(0.0));
    if let Some(unit) = payload.unit {
        new = new.unit(unit);
    }
    if let Some(image_uri) = payload.image_uri {
        new = new.image_uri(image_uri);
    }
    let product = state.engine.create_product(new).await?;

    audit::record(
        &state,
        &actor,
        "Product Created",
        format!("Created product {} ({})", product.name, product.firebase_id),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(product_view(product)).message("Product created successfully")),
    ))
}

pub async fn update(
    actor: Actor,
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<DataResponse<ProductView>>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let patch = ProductPatch {
        name: payload.name,
        category: payload.category,
        price: payload.price,
        cost_per_unit: payload.cost_per_unit,
        unit: payload.unit,
        image_uri: payload.image_uri,
    };
    if patch.is_empty() {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }
    let product = state.engine.update_product(&id, patch).await?;

    audit::record(
        &state,
        &actor,
        "Product Updated",
        format!("Updated product {} ({})", product.name, product.firebase_id),
    )
    .await;

    Ok(Json(
        DataResponse::new(product_view(product)).message("Product updated successfully"),
    ))
}

pub async fn delete(
    actor: Actor,
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
    let Path(id) = id?;
    let product = state.engine.delete_product(&id).await?;

    audit::record(
        &state,
        &actor,
        "Product Deleted",
        format!("Deleted product {} ({})", product.name, product.firebase_id),
    )
    .await;

    Ok(Json(MessageResponse::ok(format!(
        "Product \"{}\" deleted successfully",
        product.name
    ))))
}

pub async fn transfer(
    actor: Actor,
    State(state): State<ServerState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ServerError> {
    let Json(payload) = payload?;
    if payload.firebase_id.trim().is_empty() {
        return Err(ServerError::Generic(
            "Missing required fields: firebaseId and quantity".to_string(),
        ));
    }

    let stock = state
        .engine
        .transfer(TransferCmd::new(payload.firebase_id.as_str(), payload.quantity))
        .await?;

    audit::record(
        &state,
        &actor,
        "Inventory Transfer",
        format!(
            "Transferred {} units of {} to Inventory B",
            payload.quantity, payload.firebase_id
        ),
    )
    .await;

    Ok(Json(TransferResponse {
        success: true,
        message: format!(
            "Successfully transferred {} units to Inventory B",
            payload.quantity
        ),
        new_inventory_a: stock.inventory_a,
        new_inventory_b: stock.inventory_b,
    }))
}

pub async fn set_inventory(
    actor: Actor,
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<InventoryUpdate>, JsonRejection>,
) -> Result<Json<DataResponse<ProductView>>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    if payload.inventory_a.is_none() && payload.inventory_b.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of inventory_a or inventory_b".to_string(),
        ));
    }

    let product = state
        .engine
        .set_inventory(SetInventoryCmd {
            product_id: id.clone(),
            inventory_a: payload.inventory_a,
            inventory_b: payload.inventory_b,
        })
        .await?;

    audit::record(
        &state,
        &actor,
        "Inventory Adjusted",
        format!(
            "Set {id} to inventory A {} / inventory B {}",
            product.inventory_a, product.inventory_b
        ),
    )
    .await;

    Ok(Json(
        DataResponse::new(product_view(product)).message("Inventory updated successfully"),
    ))
}
