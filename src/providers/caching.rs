//! Rate provider backed by a single-slot persisted cache entry

use crate::core::clock::Clock;
use crate::core::error::FetchError;
use crate::core::rates::{RateProvider, RateSource, RateTable};
use crate::core::store::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const CACHE_KEY: &str = "currency_rates_cache";
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// The one persisted record. `time` is the fetch time in epoch milliseconds.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    base: String,
    time: i64,
    data: RateTable,
}

pub struct CachingRateProvider {
    source: Arc<dyn RateSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl CachingRateProvider {
    pub fn new(
        source: Arc<dyn RateSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            ttl,
        }
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// An entry is fresh when its age is in `[0, ttl)`. Ages that overflow or
    /// lie in the future count as stale.
    fn is_fresh(&self, now: i64, entry: &CacheEntry) -> bool {
        now.checked_sub(entry.time)
            .is_some_and(|age| (0..self.ttl_millis()).contains(&age))
    }

    fn read_entry(&self) -> Option<CacheEntry> {
        let raw = self.store.get_item(CACHE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Dropping unreadable cache entry: {}", e);
                self.store.remove_item(CACHE_KEY);
                None
            }
        }
    }

    fn write_entry(&self, entry: &CacheEntry) {
        match serde_json::to_string(entry) {
            Ok(raw) => self.store.set_item(CACHE_KEY, &raw),
            Err(e) => debug!("Failed to encode cache entry: {}", e),
        }
    }
}

#[async_trait]
impl RateProvider for CachingRateProvider {
    #[instrument(name = "GetRates", skip(self), fields(base = %base))]
    async fn get_rates(&self, base: &str) -> Result<RateTable, FetchError> {
        let now = self.clock.now().timestamp_millis();

        match self.read_entry() {
            Some(entry) if entry.base == base && self.is_fresh(now, &entry) => {
                debug!("Cache HIT for base: {}", base);
                return Ok(entry.data);
            }
            Some(entry) => debug!(
                cached_base = %entry.base,
                age_ms = ?now.checked_sub(entry.time),
                "Cache entry unusable for base: {}", base
            ),
            None => debug!("Cache MISS for base: {}", base),
        }

        let table = self.source.fetch_table(base).await?;

        self.write_entry(&CacheEntry {
            base: base.to_string(),
            time: self.clock.now().timestamp_millis(),
            data: table.clone(),
        });
        Ok(table)
    }
}
