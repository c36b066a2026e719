//! Inventory consistency engine for the Banelo point-of-sale backend.
//!
//! The engine owns every write that touches more than one row: moving stock
//! between a product's two buckets, writing off waste, and replacing a
//! recipe's ingredient set. Each of those runs as a single atomic unit, so a
//! failure at any step leaves no visible effect.

pub use audit_trail::AuditEntry;
pub use commands::{
    AuditCmd, IngredientLine, NewProduct, ProductPatch, RecipeCmd, SetInventoryCmd, TransferCmd,
    WasteCmd,
};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, WasteLogFilter};
pub use products::{DEFAULT_PRODUCT_UNIT, Product, Stock};
pub use quantity::Quantity;
pub use recipe_ingredients::{DEFAULT_INGREDIENT_UNIT, RecipeIngredient};
pub use recipes::Recipe;
pub use waste_logs::{DEFAULT_RECORDER, WasteLogEntry};

mod audit_trail;
mod commands;
mod error;
mod ops;
mod products;
mod quantity;
mod recipe_ingredients;
mod recipes;
mod util;
mod waste_logs;

type ResultEngine<T> = Result<T, EngineError>;
