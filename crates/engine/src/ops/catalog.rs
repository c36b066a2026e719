use chrono::Utc;

use sea_orm::{ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    DEFAULT_PRODUCT_UNIT, EngineError, NewProduct, Product, ProductPatch, ResultEngine, products,
    recipes,
    util::{normalize_optional_text, normalize_required, validate_non_negative},
};

use super::Engine;

impl Engine {
    /// Return a product snapshot from DB.
    pub async fn product(&self, product_id: &str) -> ResultEngine<Product> {
        let model = products::Entity::find_by_id(product_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("product {product_id}")))?;
        Ok(model.into())
    }

    /// Return every product, ordered by name.
    pub async fn products(&self) -> ResultEngine<Vec<Product>> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    /// Add a new product.
    ///
    /// The key is assigned by the caller and must be unused. The `quantity`
    /// mirror is initialized from `inventory_b`.
    pub async fn create_product(&self, new: NewProduct) -> ResultEngine<Product> {
        let now = Utc::now();
        let product = Product {
            firebase_id: normalize_required(&new.firebase_id, "product id")?,
            name: normalize_required(&new.name, "product name")?,
            category: normalize_required(&new.category, "category")?,
            price: validate_non_negative(new.price, "price")?,
            quantity: validate_non_negative(new.inventory_b, "inventory_b")?,
            inventory_a: validate_non_negative(new.inventory_a, "inventory_a")?,
            inventory_b: validate_non_negative(new.inventory_b, "inventory_b")?,
            cost_per_unit: validate_non_negative(new.cost_per_unit, "cost_per_unit")?,
            unit: normalize_optional_text(new.unit.as_deref())
                .unwrap_or_else(|| DEFAULT_PRODUCT_UNIT.to_string()),
            image_uri: new.image_uri.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.with_tx(|engine, db_tx| Box::pin(engine.insert_product(db_tx, product)))
            .await
    }

    async fn insert_product(
        &self,
        db_tx: &DatabaseTransaction,
        product: Product,
    ) -> ResultEngine<Product> {
        let exists = products::Entity::find_by_id(product.firebase_id.clone())
            .one(db_tx)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(product.firebase_id));
        }
        products::ActiveModel::from(&product).insert(db_tx).await?;
        Ok(product)
    }

    /// Update the descriptive fields of a product.
    ///
    /// Stock buckets (and their mirror) are not touched.
    pub async fn update_product(
        &self,
        product_id: &str,
        patch: ProductPatch,
    ) -> ResultEngine<Product> {
        let product_id = normalize_required(product_id, "product id")?;
        if patch.is_empty() {
            return Err(EngineError::InvalidArgument(
                "provide at least one field to update".to_string(),
            ));
        }

        let mut active = products::ActiveModel {
            firebase_id: ActiveValue::Unchanged(product_id.clone()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = patch.name.as_deref() {
            active.name = ActiveValue::Set(normalize_required(name, "product name")?);
        }
        if let Some(category) = patch.category.as_deref() {
            active.category = ActiveValue::Set(normalize_required(category, "category")?);
        }
        if let Some(price) = patch.price {
            active.price = ActiveValue::Set(validate_non_negative(price, "price")?);
        }
        if let Some(cost) = patch.cost_per_unit {
            active.cost_per_unit = ActiveValue::Set(validate_non_negative(cost, "cost_per_unit")?);
        }
        if let Some(unit) = patch.unit.as_deref() {
            active.unit = ActiveValue::Set(normalize_required(unit, "unit")?);
        }
        if let Some(image_uri) = patch.image_uri {
            active.image_uri = ActiveValue::Set(image_uri);
        }

        self.with_tx(|engine, db_tx| {
            Box::pin(engine.apply_product_patch(db_tx, product_id, active))
        })
        .await
    }

    async fn apply_product_patch(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: String,
        active: products::ActiveModel,
    ) -> ResultEngine<Product> {
        self.require_product(db_tx, &product_id).await?;
        let model = active.update(db_tx).await?;
        Ok(model.into())
    }

    /// Delete a product.
    ///
    /// Refused with `InUse` while a recipe still references it. Waste and
    /// audit history keep their copy of the product name.
    pub async fn delete_product(&self, product_id: &str) -> ResultEngine<Product> {
        let product_id = normalize_required(product_id, "product id")?;
        self.with_tx(|engine, db_tx| Box::pin(engine.remove_product(db_tx, product_id)))
            .await
    }

    async fn remove_product(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: String,
    ) -> ResultEngine<Product> {
        let model = self.lock_product(db_tx, &product_id).await?;
        let recipe_count = recipes::Entity::find()
            .filter(recipes::Column::ProductFirebaseId.eq(product_id.as_str()))
            .count(db_tx)
            .await?;
        if recipe_count > 0 {
            return Err(EngineError::InUse(format!(
                "product {product_id} ({recipe_count} recipes)"
            )));
        }
        products::Entity::delete_by_id(product_id).exec(db_tx).await?;
        Ok(model.into())
    }
}
