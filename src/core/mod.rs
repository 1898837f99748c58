//! Core business logic abstractions

pub mod animation;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod log;
pub mod rates;
pub mod store;

// Re-export main types for cleaner imports
pub use controller::{ConversionController, Theme, WidgetView};
pub use error::{CurrencyListError, FetchError};
pub use rates::{RateProvider, RateSource, RateTable};
