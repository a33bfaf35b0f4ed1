use std::sync::Arc;

use crate::config::StoreConfig;
use crate::store::{ContentStore, MySqlStore, RestStore, StoreError};

/// Builds the content store described by the configuration. `Ok(None)` means
/// no store is configured; the site still runs and answers with the
/// configuration-needed message.
pub async fn establish_connection(
    config: &StoreConfig,
) -> Result<Option<Arc<dyn ContentStore>>, StoreError> {
    match config {
        StoreConfig::MySql {
            url,
            max_connections,
        } => {
            let pool = sqlx::mysql::MySqlPoolOptions::new()
                .max_connections(*max_connections)
                .connect(url)
                .await
                .map_err(|e| {
                    log::error!("Gagal membuat pool database: {:?}", e);
                    e
                })?;
            log::info!("Content store: MySQL ({} koneksi)", max_connections);
            Ok(Some(Arc::new(MySqlStore::new(pool))))
        }
        StoreConfig::Rest { url, key } => {
            let store = RestStore::new(url, key)?;
            log::info!("Content store: REST {}", url);
            Ok(Some(Arc::new(store)))
        }
        StoreConfig::Missing => {
            log::warn!("DATABASE_URL maupun CONTENT_STORE_URL tidak ditemukan di .env");
            Ok(None)
        }
    }
}
