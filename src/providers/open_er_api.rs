use crate::core::error::FetchError;
use crate::core::rates::{RateSource, RateTable};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Rate source for the open.er-api.com `latest` endpoint.
pub struct OpenErApiSource {
    base_url: String,
    client: reqwest::Client,
}

impl OpenErApiSource {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("xconv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(OpenErApiSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    rates: Option<BTreeMap<String, f64>>,
    time_last_update_utc: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl RateSource for OpenErApiSource {
    #[instrument(name = "OpenErApiFetch", skip(self), fields(base = %base))]
    async fn fetch_table(&self, base: &str) -> Result<RateTable, FetchError> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                base: base.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                base: base.to_string(),
                status: response.status(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Network {
                base: base.to_string(),
                source,
            })?;

        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Malformed {
                base: base.to_string(),
                message: e.to_string(),
            })?;

        if data.result != "success" {
            let result = match data.error_type {
                Some(kind) => format!("{} ({})", data.result, kind),
                None => data.result,
            };
            return Err(FetchError::Api {
                base: base.to_string(),
                result,
            });
        }

        let rates = data.rates.ok_or_else(|| FetchError::Malformed {
            base: base.to_string(),
            message: "response has no rates".to_string(),
        })?;

        debug!(count = rates.len(), "Received exchange rates");
        Ok(RateTable::new(
            base,
            Utc::now(),
            rates,
            data.time_last_update_utc.as_deref().unwrap_or_default(),
        ))
    }
}
