//! Rate tables and the abstractions that produce them

use super::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exchange rates for every known currency relative to a single base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub fetched_at: DateTime<Utc>,
    pub rates: BTreeMap<String, f64>,
    /// Last update time as reported by the rate server.
    pub source_update_time: String,
}

impl RateTable {
    /// Builds a table, mapping the base currency to 1.0 when the server omits it.
    pub fn new(
        base: &str,
        fetched_at: DateTime<Utc>,
        mut rates: BTreeMap<String, f64>,
        source_update_time: &str,
    ) -> Self {
        rates.entry(base.to_string()).or_insert(1.0);
        Self {
            base: base.to_string(),
            fetched_at,
            rates,
            source_update_time: source_update_time.to_string(),
        }
    }

    pub fn rate_for(&self, target: &str) -> Result<f64, FetchError> {
        self.rates
            .get(target)
            .copied()
            .ok_or_else(|| FetchError::UnknownCurrency {
                base: self.base.clone(),
                target: target.to_string(),
            })
    }

    /// Currency codes in lexicographic order.
    pub fn currencies(&self) -> Vec<String> {
        self.rates.keys().cloned().collect()
    }

    pub fn source_updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(&self.source_update_time)
            .or_else(|_| DateTime::parse_from_rfc3339(&self.source_update_time))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn last_update_display(&self) -> String {
        match self.source_updated_at() {
            Some(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            None => self.source_update_time.clone(),
        }
    }
}

/// Remote collaborator that knows how to fetch a rate table for a base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_table(&self, base: &str) -> Result<RateTable, FetchError>;
}

/// Hands out rate tables, possibly from a cache.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn get_rates(&self, base: &str) -> Result<RateTable, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn table() -> RateTable {
        let rates = BTreeMap::from([("BDT".to_string(), 110.5), ("EUR".to_string(), 0.92)]);
        RateTable::new(
            "USD",
            Utc::now(),
            rates,
            "Fri, 02 Apr 2021 00:06:31 +0000",
        )
    }

    #[test]
    fn test_base_is_mapped_to_one() {
        let table = table();
        assert_eq!(table.rate_for("USD").unwrap(), 1.0);
        assert_eq!(table.rate_for("BDT").unwrap(), 110.5);
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let err = table().rate_for("XYZ").unwrap_err();
        assert!(matches!(err, FetchError::UnknownCurrency { ref target, .. } if target == "XYZ"));
    }

    #[test]
    fn test_currencies_are_sorted() {
        assert_eq!(table().currencies(), vec!["BDT", "EUR", "USD"]);
    }

    #[test]
    fn test_source_update_time_parsing() {
        let table = table();
        assert_eq!(
            table.source_updated_at(),
            Some(Utc.with_ymd_and_hms(2021, 4, 2, 0, 6, 31).unwrap())
        );

        let mut bad = table.clone();
        bad.source_update_time = "sometime yesterday".to_string();
        assert!(bad.source_updated_at().is_none());
        assert_eq!(bad.last_update_display(), "sometime yesterday");
    }
}
