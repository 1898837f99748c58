//! Error taxonomy for rate retrieval and currency list population

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error for base currency {base}: {source}")]
    Network {
        base: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for base currency: {base}")]
    Status {
        base: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse rate response for {base}: {message}")]
    Malformed { base: String, message: String },

    #[error("API error: result '{result}' for base currency: {base}")]
    Api { base: String, result: String },

    #[error("No rate for {target} in the {base} rate table")]
    UnknownCurrency { base: String, target: String },
}

#[derive(Error, Debug)]
pub enum CurrencyListError {
    #[error("Failed to load currencies: {0}")]
    Fetch(#[from] FetchError),

    #[error("Rate table for {0} lists no currencies")]
    Empty(String),
}
