use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use super::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};
use crate::config::DatabaseConfig;

/// Open the configured document store.
///
/// With a database URL this connects a Postgres pool and creates the
/// `documents` table if needed. Without one, a fresh in-memory store is used.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let Some(url) = config.url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory document store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    info!("Created database pool (max {} connections)", config.max_connections);

    let store = PgDocumentStore::new(pool);
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_url_falls_back_to_memory() {
        let config = DatabaseConfig {
            url: None,
            max_connections: 1,
            connection_timeout: 1,
        };
        let store = open_store(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
        assert_eq!(store.count("roles").await.unwrap(), 0);
    }
}
