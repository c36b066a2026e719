use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, NewProduct, Quantity, SetInventoryCmd, TransferCmd, WasteCmd, WasteLogFilter};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "banelo_admin")]
#[command(about = "Admin utilities for Banelo (seed products, move stock, inspect recipes)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./banelo.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    Product(Product),
    Recipe(Recipe),
    Waste(Waste),
}

#[derive(Args, Debug)]
struct Product {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    Add(ProductAddArgs),
    List,
    /// Move stock from inventory A to inventory B.
    Transfer(TransferArgs),
    /// Set absolute stock levels after a count.
    Stocktake(StocktakeArgs),
}

#[derive(Args, Debug)]
struct ProductAddArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: String,
    #[arg(long, default_value_t = 0.0)]
    price: f64,
    #[arg(long, default_value_t = 0.0)]
    inventory_a: f64,
    #[arg(long, default_value_t = 0.0)]
    inventory_b: f64,
    #[arg(long)]
    unit: Option<String>,
}

#[derive(Args, Debug)]
struct TransferArgs {
    #[arg(long)]
    product: String,
    /// Accepts `.` or `,` as decimal separator.
    #[arg(long)]
    quantity: Quantity,
}

#[derive(Args, Debug)]
struct StocktakeArgs {
    #[arg(long)]
    product: String,
    #[arg(long)]
    inventory_a: Option<f64>,
    #[arg(long)]
    inventory_b: Option<f64>,
}

#[derive(Args, Debug)]
struct Recipe {
    #[command(subcommand)]
    command: RecipeCommand,
}

#[derive(Subcommand, Debug)]
enum RecipeCommand {
    List,
}

#[derive(Args, Debug)]
struct Waste {
    #[command(subcommand)]
    command: WasteCommand,
}

#[derive(Subcommand, Debug)]
enum WasteCommand {
    /// Write off stock from inventory B.
    Record(WasteRecordArgs),
    List,
}

#[derive(Args, Debug)]
struct WasteRecordArgs {
    #[arg(long)]
    product: String,
    #[arg(long)]
    quantity: Quantity,
    #[arg(long)]
    reason: Option<String>,
    #[arg(long)]
    recorded_by: Option<String>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Migrate => println!("database is up to date"),
        Command::Product(Product { command }) => match command {
            ProductCommand::Add(args) => {
                let mut new = NewProduct::new(args.id, args.name, args.category)
                    .price(args.price)
                    .stock(args.inventory_a, args.inventory_b);
                if let Some(unit) = args.unit {
                    new = new.unit(unit);
                }
                let product = engine.create_product(new).await?;
                println!("created product: {} ({})", product.name, product.firebase_id);
            }
            ProductCommand::List => {
                for p in engine.products().await? {
                    println!(
                        "{:<24} {:<24} A={:<10} B={:<10} {}",
                        p.firebase_id, p.name, p.inventory_a, p.inventory_b, p.unit
                    );
                }
            }
            ProductCommand::Transfer(args) => {
                let stock = engine
                    .transfer(TransferCmd::new(args.product, args.quantity.value()))
                    .await?;
                println!(
                    "transferred {}: A={} B={}",
                    args.quantity, stock.inventory_a, stock.inventory_b
                );
            }
            ProductCommand::Stocktake(args) => {
                let stock = engine
                    .set_inventory(SetInventoryCmd {
                        product_id: args.product,
                        inventory_a: args.inventory_a,
                        inventory_b: args.inventory_b,
                    })
                    .await?;
                println!("stock set: A={} B={}", stock.inventory_a, stock.inventory_b);
            }
        },
        Command::Recipe(Recipe {
            command: RecipeCommand::List,
        }) => {
            for recipe in engine.recipes().await? {
                let servings = engine.max_servings(&recipe).await?;
                println!(
                    "{} #{} ({}) servings={}",
                    recipe.product_name,
                    recipe.product_number,
                    recipe.id,
                    servings.map_or_else(|| "-".to_string(), |n| n.to_string())
                );
                for line in &recipe.ingredients {
                    println!(
                        "    {} {} {}",
                        line.quantity_needed, line.unit, line.ingredient_name
                    );
                }
            }
        }
        Command::Waste(Waste { command }) => match command {
            WasteCommand::Record(args) => {
                let mut cmd = WasteCmd::new(args.product, args.quantity.value());
                if let Some(reason) = args.reason {
                    cmd = cmd.reason(reason);
                }
                if let Some(recorded_by) = args.recorded_by {
                    cmd = cmd.recorded_by(recorded_by);
                }
                let inventory_b = engine.waste_deduct(cmd).await?;
                println!("recorded waste of {}: B={inventory_b}", args.quantity);
            }
            WasteCommand::List => {
                for entry in engine.waste_logs(&WasteLogFilter::default()).await? {
                    println!(
                        "{} {:<24} {:<8} {:<16} {}",
                        entry.waste_date.format("%Y-%m-%d %H:%M"),
                        entry.product_name,
                        entry.quantity,
                        entry.reason.as_deref().unwrap_or("-"),
                        entry.recorded_by
                    );
                }
            }
        },
    }

    Ok(())
}
