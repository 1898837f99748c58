pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::KeyValueStore;
use anyhow::Context;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opens the store backing the rate cache.
///
/// Uses the on-disk store under `<data_path>/cache` when persistence is
/// enabled, and falls back to memory if it cannot be opened.
pub fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    if !config.cache.persist {
        debug!("Cache persistence disabled, using in-memory store");
        return Arc::new(MemoryStore::new());
    }

    let opened = config.default_data_path().and_then(|path| {
        let cache_dir = path.join("cache");
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create directory: {}", cache_dir.display()))?;
        DiskStore::open(&cache_dir)
            .with_context(|| format!("Failed to open cache at {}", cache_dir.display()))
    });

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Persistent cache unavailable, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}
