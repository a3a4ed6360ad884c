use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use debtbook::{config::Config, db, services::ping_service};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("debtbook=debug".parse().unwrap())
                .add_directive("sqlx=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("Starting debtbook ledger store...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return;
        }
    };

    let pool = match db::init_db(&config.database_url).await {
        Ok(p) => {
            info!("Database initialized successfully");
            p
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    // The conversational front-end drives the ledger through the library
    // API; this process only keeps the schema current and the store warm.
    let keepalive = tokio::spawn(ping_service::run_keepalive(
        pool.clone(),
        config.keepalive_interval,
    ));

    info!(
        interval_secs = config.keepalive_interval.as_secs(),
        "Keep-alive running, press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    keepalive.abort();
    info!("Shutting down");
}
