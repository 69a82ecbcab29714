use presupuestos_rs::api::ApiServer;
use presupuestos_rs::config::Config;
use presupuestos_rs::ledger::LedgerManager;
use presupuestos_rs::storage::AttachmentStorage;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = if std::path::Path::new("config.toml").exists() {
        Config::from_file("config.toml")?
    } else {
        Config::default()
    };

    // Initialize logging
    let level = Level::from_str(&config.logging.level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting presupuestos-rs");
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Database: {}", config.storage.database_url);
    info!("  Uploads: {}", config.storage.upload_path);

    // Open the database, creating the file on first run
    let options = SqliteConnectOptions::from_str(&config.storage.database_url)?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    // Schema and seed data; failure here is fatal
    let ledger = LedgerManager::new(pool);
    ledger.init_db().await?;
    ledger.seed_cost_centers().await?;

    let attachments = AttachmentStorage::new(config.storage.upload_path.clone());

    let server = ApiServer::new(ledger, attachments, config.server.listen_addr.clone());
    server.run().await?;

    Ok(())
}
