use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "banelo={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings).await?;

    let mut builder = engine::Engine::builder().database(db);
    if let Some(timeout) = settings.engine.transaction_timeout() {
        builder = builder.transaction_timeout(timeout);
    }
    let engine = builder.build().await?;

    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    server::run_with_listener(engine, listener).await?;
    Ok(())
}

async fn connect(
    settings: &settings::Settings,
) -> Result<DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = settings.database.url();
    let mut options = ConnectOptions::new(url.clone());
    if let Some(ms) = settings.database_pool.acquire_timeout_ms {
        options.acquire_timeout(Duration::from_millis(ms));
    }
    if let Some(max) = settings.database_pool.max_connections {
        options.max_connections(max);
    }

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready at {url}");
    Ok(database)
}
