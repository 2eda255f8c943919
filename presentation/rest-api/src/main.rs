use dotenvy::dotenv;

mod api;
mod config;
mod setup;

use config::app_config::AppConfig;
use setup::{dependency_injection::DependencyContainer, server::Server};

/// REST API Entry Point
///
/// Loads configuration, opens the document store, wires the shopping list
/// use cases and starts the HTTP server.
///
/// - config/: server, CORS and document store settings
/// - setup/: dependency injection and server setup
/// - api/: route handlers, DTOs and error mapping
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Initialize tracing with RUST_LOG env filter
    logger::init_tracing("info");

    // 3. Load configuration
    let config = AppConfig::from_env()?;

    // 4. Open the store and wire dependencies
    let container = DependencyContainer::new(&config.store).await?;

    // 5. Run server
    Server::run(config, container).await?;

    Ok(())
}
