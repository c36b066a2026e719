//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transfer, waste,
//! recipe replacement, product management), keeping call sites readable and
//! avoiding long argument lists. Values are validated by the engine, not here.

/// Move stock from bucket A to bucket B of one product.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub product_id: String,
    pub quantity: f64,
}

impl TransferCmd {
    #[must_use]
    pub fn new(product_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Write off stock from bucket B and record it in the waste ledger.
#[derive(Clone, Debug)]
pub struct WasteCmd {
    pub product_id: String,
    /// Display name stored on the ledger row. Falls back to the product name.
    pub product_name: Option<String>,
    /// Category stored on the ledger row. Falls back to the product category.
    pub category: Option<String>,
    pub quantity: f64,
    /// Optional. Blank reasons are stored as no reason.
    pub reason: Option<String>,
    /// Falls back to `"system"`.
    pub recorded_by: Option<String>,
}

impl WasteCmd {
    #[must_use]
    pub fn new(product_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: None,
            category: None,
            quantity,
            reason: None,
            recorded_by: None,
        }
    }

    #[must_use]
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn recorded_by(mut self, recorded_by: impl Into<String>) -> Self {
        self.recorded_by = Some(recorded_by.into());
        self
    }
}

/// One ingredient line submitted with a recipe.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientLine {
    pub ingredient_firebase_id: String,
    pub ingredient_name: String,
    pub quantity_needed: f64,
    /// Falls back to `"g"`.
    pub unit: Option<String>,
}

impl IngredientLine {
    #[must_use]
    pub fn new(
        ingredient_firebase_id: impl Into<String>,
        ingredient_name: impl Into<String>,
        quantity_needed: f64,
    ) -> Self {
        Self {
            ingredient_firebase_id: ingredient_firebase_id.into(),
            ingredient_name: ingredient_name.into(),
            quantity_needed,
            unit: None,
        }
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Scalar fields and full ingredient set of a recipe, used by both create
/// and update.
#[derive(Clone, Debug)]
pub struct RecipeCmd {
    pub product_id: String,
    pub product_name: String,
    /// Falls back to `0`.
    pub product_number: Option<i32>,
    pub ingredients: Vec<IngredientLine>,
}

impl RecipeCmd {
    #[must_use]
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            product_number: None,
            ingredients: Vec::new(),
        }
    }

    #[must_use]
    pub fn product_number(mut self, number: i32) -> Self {
        self.product_number = Some(number);
        self
    }

    #[must_use]
    pub fn ingredient(mut self, line: IngredientLine) -> Self {
        self.ingredients.push(line);
        self
    }

    #[must_use]
    pub fn ingredients(mut self, lines: Vec<IngredientLine>) -> Self {
        self.ingredients = lines;
        self
    }
}

/// Create a product.
///
/// There is no way to set the `quantity` mirror: it is derived from
/// `inventory_b`.
#[derive(Clone, Debug)]
pub struct NewProduct {
    pub firebase_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub inventory_a: f64,
    pub inventory_b: f64,
    pub cost_per_unit: f64,
    /// Falls back to `"pcs"`.
    pub unit: Option<String>,
    pub image_uri: Option<String>,
}

impl NewProduct {
    #[must_use]
    pub fn new(
        firebase_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            firebase_id: firebase_id.into(),
            name: name.into(),
            category: category.into(),
            price: 0.0,
            inventory_a: 0.0,
            inventory_b: 0.0,
            cost_per_unit: 0.0,
            unit: None,
            image_uri: None,
        }
    }

    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn stock(mut self, inventory_a: f64, inventory_b: f64) -> Self {
        self.inventory_a = inventory_a;
        self.inventory_b = inventory_b;
        self
    }

    #[must_use]
    pub fn cost_per_unit(mut self, cost: f64) -> Self {
        self.cost_per_unit = cost;
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn image_uri(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }
}

/// Partial update of a product's descriptive fields.
///
/// Stock buckets are not part of the patch; use
/// [`Engine::set_inventory`](crate::Engine::set_inventory) for stocktakes.
#[derive(Clone, Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cost_per_unit: Option<f64>,
    pub unit: Option<String>,
    pub image_uri: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.cost_per_unit.is_none()
            && self.unit.is_none()
            && self.image_uri.is_none()
    }
}

/// Absolute stock levels from a stocktake. At least one bucket is required.
#[derive(Clone, Debug)]
pub struct SetInventoryCmd {
    pub product_id: String,
    pub inventory_a: Option<f64>,
    pub inventory_b: Option<f64>,
}

/// Append one audit entry.
#[derive(Clone, Debug)]
pub struct AuditCmd {
    pub action: String,
    pub user_id: String,
    pub user_name: String,
    pub details: Option<String>,
}

impl AuditCmd {
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
