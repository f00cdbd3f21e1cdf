use anyhow::Result;
use tracing::{error, info, trace};

use crate::config::connect_and_migrate;

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    if let Err(e) = connect_and_migrate(database_url).await {
        error!("Failed to initialize database '{}': {}", database_url, e);
        return Err(e);
    }

    info!("Database initialization completed successfully!");
    Ok(())
}
