//! Initial schema migration - creates all tables from scratch.
//!
//! - `products`: stocked items with their two buckets
//! - `recipes`: one recipe per sellable product
//! - `recipe_ingredients`: ordered ingredient lines of a recipe
//! - `waste_logs`: append-only write-offs from bucket B
//! - `audit_trail`: append-only operator actions

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Products {
    Table,
    FirebaseId,
    Name,
    Category,
    Price,
    Quantity,
    InventoryA,
    InventoryB,
    CostPerUnit,
    Unit,
    ImageUri,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Recipes {
    Table,
    FirebaseId,
    ProductFirebaseId,
    ProductName,
    ProductNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RecipeIngredients {
    Table,
    FirebaseId,
    RecipeFirebaseId,
    IngredientFirebaseId,
    IngredientName,
    QuantityNeeded,
    Unit,
    Position,
    CreatedAt,
}

#[derive(Iden)]
enum WasteLogs {
    Table,
    Id,
    ProductFirebaseId,
    ProductName,
    Category,
    Quantity,
    Reason,
    RecordedBy,
    WasteDate,
}

#[derive(Iden)]
enum AuditTrail {
    Table,
    Id,
    Action,
    UserId,
    UserName,
    Details,
    Timestamp,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Products
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::FirebaseId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Category).string().not_null())
                    .col(ColumnDef::new(Products::Price).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Products::Quantity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Products::InventoryA)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Products::InventoryB)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Products::CostPerUnit)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Products::Unit)
                            .string()
                            .not_null()
                            .default("pcs"),
                    )
                    .col(
                        ColumnDef::new(Products::ImageUri)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Products::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-name")
                    .table(Products::Table)
                    .col(Products::Name)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Recipes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipes::FirebaseId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Recipes::ProductFirebaseId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::ProductName).string().not_null())
                    .col(
                        ColumnDef::new(Recipes::ProductNumber)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Recipes::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Recipes::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipes-product_firebase_id")
                            .from(Recipes::Table, Recipes::ProductFirebaseId)
                            .to(Products::Table, Products::FirebaseId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipes-product_firebase_id")
                    .table(Recipes::Table)
                    .col(Recipes::ProductFirebaseId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Recipe ingredients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeIngredients::FirebaseId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::RecipeFirebaseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::IngredientFirebaseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::IngredientName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::QuantityNeeded)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::Unit)
                            .string()
                            .not_null()
                            .default("g"),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe_ingredients-recipe_firebase_id")
                            .from(RecipeIngredients::Table, RecipeIngredients::RecipeFirebaseId)
                            .to(Recipes::Table, Recipes::FirebaseId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipe_ingredients-recipe")
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::RecipeFirebaseId)
                    .col(RecipeIngredients::Position)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Waste logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WasteLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WasteLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WasteLogs::ProductFirebaseId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WasteLogs::ProductName).string().not_null())
                    .col(ColumnDef::new(WasteLogs::Category).string().not_null())
                    .col(ColumnDef::new(WasteLogs::Quantity).double().not_null())
                    .col(ColumnDef::new(WasteLogs::Reason).string().null())
                    .col(
                        ColumnDef::new(WasteLogs::RecordedBy)
                            .string()
                            .not_null()
                            .default("system"),
                    )
                    .col(ColumnDef::new(WasteLogs::WasteDate).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-waste_logs-waste_date")
                    .table(WasteLogs::Table)
                    .col(WasteLogs::WasteDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Audit trail
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(AuditTrail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditTrail::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditTrail::Action).string().not_null())
                    .col(ColumnDef::new(AuditTrail::UserId).string().not_null())
                    .col(ColumnDef::new(AuditTrail::UserName).string().not_null())
                    .col(
                        ColumnDef::new(AuditTrail::Details)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(AuditTrail::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(AuditTrail::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WasteLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        Ok(())
    }
}
