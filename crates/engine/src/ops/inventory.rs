//! Stock movements between and out of a product's buckets.
//!
//! Every operation here reads the current buckets and writes the new ones
//! inside one atomic unit. Writes are guarded updates (`WHERE bucket >= q`)
//! and the affected-row count is checked, so a concurrent writer that slipped
//! in between the read and the write can never drive a bucket below zero.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};

use crate::{
    DEFAULT_RECORDER, EngineError, Product, Quantity, ResultEngine, SetInventoryCmd, Stock,
    TransferCmd,
    WasteCmd, WasteLogEntry, products,
    util::{normalize_optional_text, normalize_required, validate_non_negative},
    waste_logs,
};

use super::Engine;

/// Validated waste write-off, ready to be applied.
struct WasteInput {
    product_id: String,
    quantity: Quantity,
    reason: Option<String>,
    product_name: Option<String>,
    category: Option<String>,
    recorded_by: String,
}

fn insufficient(bucket: &str, available: f64, requested: Quantity) -> EngineError {
    EngineError::InsufficientStock(format!(
        "Inventory {bucket}. Available: {available}, Requested: {requested}"
    ))
}

impl Engine {
    /// Move `quantity` units from bucket A to bucket B.
    ///
    /// Fails with `InsufficientStock` when bucket A holds less than the
    /// requested quantity; nothing is written in that case. The `quantity`
    /// mirror is set to the new bucket B value.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<Stock> {
        let product_id = normalize_required(&cmd.product_id, "product id")?;
        let quantity = Quantity::new(cmd.quantity)?;

        let stock = self
            .with_tx(|engine, db_tx| Box::pin(engine.apply_transfer(db_tx, product_id, quantity)))
            .await?;

        tracing::debug!(
            "transferred {quantity} units to inventory B (a={}, b={})",
            stock.inventory_a,
            stock.inventory_b
        );
        Ok(stock)
    }

    async fn apply_transfer(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: String,
        quantity: Quantity,
    ) -> ResultEngine<Stock> {
        let product = self.lock_product(db_tx, &product_id).await?;
        if product.inventory_a < quantity.value() {
            return Err(insufficient("A", product.inventory_a, quantity));
        }

        let q = quantity.value();
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::InventoryA,
                Expr::col(products::Column::InventoryA).sub(q),
            )
            .col_expr(
                products::Column::InventoryB,
                Expr::col(products::Column::InventoryB).add(q),
            )
            // Right-hand sides see the pre-update row, so this is the new B.
            .col_expr(
                products::Column::Quantity,
                Expr::col(products::Column::InventoryB).add(q),
            )
            .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(products::Column::FirebaseId.eq(product_id.as_str()))
            .filter(products::Column::InventoryA.gte(q))
            .exec(db_tx)
            .await?;
        if result.rows_affected != 1 {
            return Err(insufficient("A", product.inventory_a, quantity));
        }

        Ok(Stock {
            inventory_a: product.inventory_a - q,
            inventory_b: product.inventory_b + q,
        })
    }

    /// Write off `quantity` units from bucket B and append a waste ledger row.
    ///
    /// Waste is only drawn from the prepared bucket. The ledger row and the
    /// bucket update commit together: an `InsufficientStock` rejection leaves
    /// neither behind. Returns the new bucket B value.
    pub async fn waste_deduct(&self, cmd: WasteCmd) -> ResultEngine<f64> {
        let input = WasteInput {
            product_id: normalize_required(&cmd.product_id, "product id")?,
            quantity: Quantity::new(cmd.quantity)?,
            reason: normalize_optional_text(cmd.reason.as_deref()),
            product_name: normalize_optional_text(cmd.product_name.as_deref()),
            category: normalize_optional_text(cmd.category.as_deref()),
            recorded_by: normalize_optional_text(cmd.recorded_by.as_deref())
                .unwrap_or_else(|| DEFAULT_RECORDER.to_string()),
        };
        let quantity = input.quantity;

        let inventory_b = self
            .with_tx(|engine, db_tx| Box::pin(engine.apply_waste(db_tx, input)))
            .await?;

        tracing::debug!("recorded waste of {quantity} units (b={inventory_b})");
        Ok(inventory_b)
    }

    async fn apply_waste(
        &self,
        db_tx: &DatabaseTransaction,
        input: WasteInput,
    ) -> ResultEngine<f64> {
        let WasteInput {
            product_id,
            quantity,
            reason,
            product_name,
            category,
            recorded_by,
        } = input;

        let product = self.lock_product(db_tx, &product_id).await?;
        if product.inventory_b < quantity.value() {
            return Err(insufficient("B", product.inventory_b, quantity));
        }

        let now = Utc::now();
        let entry = WasteLogEntry {
            id: Uuid::new_v4(),
            product_firebase_id: product_id.clone(),
            product_name: product_name.unwrap_or_else(|| product.name.clone()),
            category: category.unwrap_or_else(|| product.category.clone()),
            quantity: quantity.value(),
            reason,
            recorded_by,
            waste_date: now,
        };
        waste_logs::ActiveModel::from(&entry).insert(db_tx).await?;

        let q = quantity.value();
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::InventoryB,
                Expr::col(products::Column::InventoryB).sub(q),
            )
            .col_expr(
                products::Column::Quantity,
                Expr::col(products::Column::InventoryB).sub(q),
            )
            .col_expr(products::Column::UpdatedAt, Expr::value(now))
            .filter(products::Column::FirebaseId.eq(product_id.as_str()))
            .filter(products::Column::InventoryB.gte(q))
            .exec(db_tx)
            .await?;
        if result.rows_affected != 1 {
            // The ledger row inserted above goes away with the rollback.
            return Err(insufficient("B", product.inventory_b, quantity));
        }

        Ok(product.inventory_b - q)
    }

    /// Stocktake: set one or both buckets to absolute values.
    ///
    /// The `quantity` mirror follows bucket B whenever B is set. Returns the
    /// product as written by the unit.
    pub async fn set_inventory(&self, cmd: SetInventoryCmd) -> ResultEngine<Product> {
        let product_id = normalize_required(&cmd.product_id, "product id")?;
        if cmd.inventory_a.is_none() && cmd.inventory_b.is_none() {
            return Err(EngineError::InvalidArgument(
                "provide at least one of inventory_a or inventory_b".to_string(),
            ));
        }
        let inventory_a = cmd
            .inventory_a
            .map(|v| validate_non_negative(v, "inventory_a"))
            .transpose()?;
        let inventory_b = cmd
            .inventory_b
            .map(|v| validate_non_negative(v, "inventory_b"))
            .transpose()?;

        self.with_tx(|engine, db_tx| {
            Box::pin(engine.apply_stock_levels(db_tx, product_id, inventory_a, inventory_b))
        })
        .await
    }

    async fn apply_stock_levels(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: String,
        inventory_a: Option<f64>,
        inventory_b: Option<f64>,
    ) -> ResultEngine<Product> {
        let product = self.lock_product(db_tx, &product_id).await?;

        let mut active = products::ActiveModel {
            firebase_id: ActiveValue::Unchanged(product.firebase_id.clone()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        if let Some(a) = inventory_a {
            active.inventory_a = ActiveValue::Set(a);
        }
        if let Some(b) = inventory_b {
            active.inventory_b = ActiveValue::Set(b);
            active.quantity = ActiveValue::Set(b);
        }
        let updated = active.update(db_tx).await?;
        Ok(Product::from(updated))
    }
}
