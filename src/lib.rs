pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::clock::SystemClock;
use crate::core::config::AppConfig;
use crate::core::rates::RateProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Currencies {
        base: Option<String>,
    },
    Widget,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rates = build_rate_provider(&config)?;

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&config, rates, &amount, from.as_deref(), to.as_deref()).await
        }
        AppCommand::Currencies { base } => {
            let base = base.unwrap_or_else(|| config.defaults.from.clone());
            cli::currencies::run(rates.as_ref(), &base).await
        }
        AppCommand::Widget => cli::widget::run(&config, rates).await,
    }
}

/// Wires the HTTP rate source to the persisted single-slot cache.
pub fn build_rate_provider(config: &AppConfig) -> Result<Arc<dyn RateProvider>> {
    let source = providers::OpenErApiSource::new(&config.api.base_url)
        .context("Failed to build HTTP client")?;
    let store = store::open_store(config);

    Ok(Arc::new(providers::CachingRateProvider::new(
        Arc::new(source),
        store,
        Arc::new(SystemClock),
        config.cache.ttl(),
    )))
}
