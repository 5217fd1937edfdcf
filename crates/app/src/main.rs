use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "wallet_service={level},server={level},engine={level},intake={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .policy(settings.wallet.into())
        .build()
        .await?;
    let engine = Arc::new(engine);

    let intake = match settings.intake {
        Some(config) => {
            tracing::info!("Found intake settings...");
            let (intake, handle) = intake::Intake::builder()
                .engine(engine.clone())
                .queues(config.queues())
                .capacity(config.capacity)
                .build()?;
            tasks.spawn(intake.run());
            Some(handle)
        }
        None => None,
    };

    if let Some(server) = settings.server {
        let engine = engine.clone();
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, intake, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    } else if intake.is_some() {
        tracing::warn!("no server configured: the bus intake has no publisher in this process");
    }

    if tasks.is_empty() {
        tracing::warn!("nothing to run: configure [server] and/or [intake]");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
